// polyql - SQL-like query front end for a column store
// Native execution first, distributed engine for what the store cannot run

// Clippy configuration
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::format_push_string)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

// Core types: values, names, schema metadata, errors
pub mod core;

// Re-export all core types as types module
pub mod types {
    pub use crate::core::*;
}

// Dialect parser (DDL, DML, queries, resource commands) and canonical rendering
pub mod parser;

// Validation, translation, planning and dual-path execution
pub mod executor;

// Secondary index kinds and index metadata extraction
pub mod index;

// Front-end configuration (file + POLYQL_* environment)
pub mod config;

// Re-export commonly used types for convenience
pub use crate::config::FrontendConfig;
pub use crate::core::{FrontendError, MetadataProvider, SchemaCatalog, SyntaxError, ValidationError, Value};
pub use crate::executor::{
    DistributedEngine, Frontend, NativeEngine, RenderedError, RenderedResult, ResultSet,
    ValidatedStatement,
};
pub use crate::index::{extract_index_metadata, IndexDescriptor, IndexKind};
pub use crate::parser::{parse_query, parse_statement, Statement};
