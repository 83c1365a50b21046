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
use std::str::FromStr;

use futures::pin_mut;
use futures::stream::TryStreamExt;

use oscloud::compute::servers;
use oscloud::Query;

#[tokio::main]
async fn main() {
    env_logger::init();
    let limit = env::args()
        .nth(1)
        .map(|s| FromStr::from_str(&s).expect("Expected a number"));

    let session = oscloud::Session::from_env()
        .await
        .expect("Failed to create an identity provider from the environment");

    let sstream = servers::list_paginated(&session, Query::default(), limit, None)
        .await
        .expect("Failed to start listing servers");
    pin_mut!(sstream);
    while let Some(srv) = sstream
        .try_next()
        .await
        .expect("Failed to fetch the next chunk")
    {
        println!("ID = {}, Name = {}, Status = {}", srv.id, srv.name, srv.status);
    }
    println!("Done listing");
}
