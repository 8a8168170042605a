// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability: message types for every operational event the engine logs.
//!
//! Messages are plain structs with a `Display` line and a [`StructuredLog`]
//! implementation that emits a `tracing` event with identifying fields
//! (stream position, record id, flow, step). The subscriber is installed by
//! the binary; the library only emits.
//!
//! [`StructuredLog`]: messages::StructuredLog

pub mod messages;
