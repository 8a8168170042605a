// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // collaborator adapters
pub mod config;     // app config + flow list
pub mod engine;     // queue, scheduler, detection
pub mod errors;     // error handling
pub mod expression; // embedded expression language
pub mod flow;       // flows and steps
pub mod observability;
pub mod record;     // records and values
pub mod traits;     // handler and port abstractions
