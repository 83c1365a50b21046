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

//! Asynchronous OpenStack client library.
//!
//! The entry point is a [Session](struct.Session.html), which can be established from the
//! environment, from a `clouds.yaml` configuration file or from an explicit authentication:
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), oscloud::Error> {
//! use futures::pin_mut;
//! use futures::stream::TryStreamExt;
//!
//! let session = oscloud::Session::from_env().await?;
//!
//! let servers = oscloud::compute::servers::list_paginated(
//!     &session,
//!     oscloud::Query::default(),
//!     None,
//!     None,
//! )
//! .await?;
//! pin_mut!(servers);
//! while let Some(server) = servers.try_next().await? {
//!     println!("ID = {}, Name = {}", server.id, server.name);
//! }
//! # Ok(()) }
//! # #[tokio::main]
//! # async fn main() { example().await.unwrap(); }
//! ```
//!
//! Lower-level plumbing is available through the [client](client/index.html) module and the
//! raw request methods on `Session` and [Adapter](struct.Adapter.html).

#![crate_name = "oscloud"]
#![crate_type = "lib"]
// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
#![deny(
    dead_code,
    improper_ctypes,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_doc_comments,
    unused_import_braces,
    unused_parens,
    unused_results,
    while_true
)]
#![allow(
    clippy::new_ret_no_self,
    clippy::should_implement_trait,
    clippy::wrong_self_convention
)]

// Used by the derive macros, which refer to the crate by its public name.
extern crate self as oscloud;

mod adapter;
mod apiversion;
mod auth;
mod basic;
pub mod blockstorage;
mod cache;
mod catalog;
pub mod client;
pub mod common;
pub mod compute;
mod endpointfilters;
mod error;
pub mod identity;
pub mod image;
mod loading;
mod macros;
pub mod network;
mod protocol;
mod query;
pub mod services;
mod session;
mod stream;
mod url;
mod utils;
pub mod waiter;

pub use crate::adapter::Adapter;
pub use crate::apiversion::ApiVersion;
pub use crate::auth::{AuthType, NoAuth};
pub use crate::basic::BasicAuth;
pub use crate::endpointfilters::{EndpointFilters, InterfaceType, ValidInterfaces};
pub use crate::error::{Error, ErrorKind};
pub use crate::loading::CloudConfig;
pub use crate::query::{Query, QueryItem};
pub use crate::session::Session;

pub use oscloud_derive::PaginatedResource;
pub use oscloud_derive::QueryItem;
