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

//! # Cubeforge Agents
//!
//! Orchestration of incremental cube texture builds.
//!
//! A build is seven bounded steps: six face captures and one assembly. The
//! [`BuildScheduler`] spreads those steps over host frame events, runs one job
//! at a time in submission order, and spends at most a configured number of
//! steps per qualifying event.

#![warn(missing_docs)]

pub mod build_agent;

pub use build_agent::*;
