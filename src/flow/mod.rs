// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flows: named, ordered chains of steps built from a declarative spec.
//!
//! Each step pairs a kind (DERIVED or FILTER) with an engine (DB_QUERY or
//! OPERATOR). The pairing picks one of four handlers when the step is built;
//! nothing is inspected per record after that.

mod factory;
mod field;
pub mod handlers;
mod pipeline;
mod process;
mod registry;
mod spec;


pub use factory::FlowFactory;
pub use field::{project_row, FieldSpec, FieldType};
pub use pipeline::Flow;
pub use process::Process;
pub use registry::FlowRegistry;
pub use spec::{
    DbQueryAttribute, Database, Expr, FlowSpec, OnEmpty, OperatorAttribute, ProcessEngine,
    ProcessKind, ProcessSpec,
};
