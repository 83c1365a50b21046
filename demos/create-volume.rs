// Copyright 2025 The oscloud contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::env;
use std::time::Duration;

use oscloud::blockstorage::protocol::VolumeStatus;
use oscloud::blockstorage::volumes;
use oscloud::blockstorage::volumes::VolumeCreate;

#[tokio::main]
async fn main() {
    env_logger::init();
    let size = env::args()
        .nth(1)
        .map(|s| s.parse().expect("Expected a number"))
        .unwrap_or(1);

    let session = oscloud::Session::from_env()
        .await
        .expect("Failed to create an identity provider from the environment");

    let mut request = VolumeCreate::new(size);
    request.name = Some("oscloud-demo".into());
    let volume = volumes::create(&session, request)
        .await
        .expect("Failed to create a volume");
    println!("Created volume {}, waiting for it to become available", volume.id);

    volumes::wait_for_status(
        &session,
        &volume.id,
        VolumeStatus::Available,
        Duration::from_secs(1),
        Some(Duration::from_secs(120)),
    )
    .await
    .expect("The volume never became available");
    println!("Volume {} is available, deleting it", volume.id);

    volumes::delete(&session, &volume.id)
        .await
        .expect("Failed to delete the volume");
    println!("Done");
}
