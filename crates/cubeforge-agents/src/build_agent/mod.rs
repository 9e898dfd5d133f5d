// Copyright 2025 eraflo
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

//! The build agent: everything between a build request and its finished cube.

mod config;
mod error;
mod frame_hook;
mod job;
mod machine;
mod request;
mod scheduler;
mod shared;
mod status;

pub use config::*;
pub use error::*;
pub use frame_hook::*;
pub use job::*;
pub use machine::*;
pub use request::*;
pub use scheduler::*;
pub use shared::*;
pub use status::*;
