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

use oscloud::image::images;
use oscloud::Query;

#[tokio::main]
async fn main() {
    env_logger::init();
    let session = oscloud::Session::from_env()
        .await
        .expect("Failed to create an identity provider from the environment");

    let found = images::list(&session, Query::default())
        .await
        .expect("Failed to list images");
    for image in found {
        println!(
            "Name = {}, Status = {}",
            image.name.unwrap_or_default(),
            image.status
        );
    }
    println!("Done listing");
}
