/// Statement execution
///
/// Structure:
/// - validate: schema checks, produces `ValidatedStatement`
/// - translate: statement + hints → native query
/// - planner: step list attached to failures
/// - dispatcher: native attempt, filtering retry, distributed fallback
/// - annotate: `line L:C` messages → marked query text
/// - engine: native / distributed collaborator traits
/// - result: rendering of results and errors

pub mod annotate;
pub mod dispatcher;
pub mod engine;
pub mod planner;
pub mod result;
pub mod translate;
pub mod validate;

pub use annotate::{annotate, locate, render_with_marker, Annotation, LocatedError};
pub use dispatcher::Executor;
pub use engine::{DistributedEngine, DistributedResult, NativeEngine, ResultSet};
pub use planner::{plan, ExecutionPath, ExecutionStep};
pub use result::{render_result, RenderedError, RenderedResult};
pub use translate::{Attempt, BuiltStatement, ExecutionHints, NativeQuery, Unsupported};
pub use validate::{validate, ValidatedStatement};

use std::collections::BTreeMap;

use tracing::{debug, error};

use crate::config::FrontendConfig;
use crate::index::{extract_index_metadata, IndexDescriptor};
use crate::parser::parse_query;
use crate::types::{ColumnRef, FrontendError, MetadataProvider, QualifiedName};

/// Single entry point: text in, rendered result or rendered error out.
pub struct Frontend<M, N, D> {
    metadata: M,
    native: N,
    distributed: D,
    config: FrontendConfig,
}

impl<M, N, D> Frontend<M, N, D>
where
    M: MetadataProvider,
    N: NativeEngine,
    D: DistributedEngine,
{
    pub fn new(metadata: M, native: N, distributed: D) -> Self {
        Self {
            metadata,
            native,
            distributed,
            config: FrontendConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: FrontendConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub const fn metadata(&self) -> &M {
        &self.metadata
    }

    /// Parses and validates `text` without executing it.
    ///
    /// # Errors
    ///
    /// Syntax errors come back with the marked query; validation errors without.
    pub fn prepare(&self, text: &str) -> Result<ValidatedStatement, RenderedError> {
        let parsed = parse_query(text).map_err(|e| {
            let annotated = render_with_marker(text, e.line, e.column, &self.config.position_marker);
            error!("{e}");
            RenderedError {
                error: FrontendError::Syntax(e),
                annotated_query: Some(annotated),
                plan: Vec::new(),
            }
        })?;
        debug!(statement = %parsed.statement, "parsed");

        validate(parsed, &self.metadata).map_err(|e| {
            error!("{e}");
            RenderedError::new(FrontendError::Validation(e))
        })
    }

    /// Runs one statement cycle.
    ///
    /// # Errors
    ///
    /// Returns the rendered failure of whichever stage stopped the statement.
    pub fn execute(&self, text: &str) -> Result<RenderedResult, RenderedError> {
        let statement = self.prepare(text)?;
        Executor::new(&self.native, &self.distributed, &self.config).execute(&statement)
    }

    /// Index descriptors of `column`, keyed by indexed field.
    #[must_use]
    pub fn index_metadata(
        &self,
        table: &QualifiedName,
        column: &str,
    ) -> BTreeMap<String, Vec<IndexDescriptor>> {
        match self.metadata.raw_index_options(table, column) {
            Some(raw) => extract_index_metadata(&ColumnRef::new(table.clone(), column), &raw),
            None => BTreeMap::new(),
        }
    }
}
