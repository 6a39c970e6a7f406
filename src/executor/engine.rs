//! Collaborator seams: the native column store and the distributed engine.
//!
//! Both are supplied by the embedding application; connection handling and
//! wire protocols live outside this crate.

use serde::Serialize;

use super::translate::NativeQuery;
use super::validate::ValidatedStatement;
use crate::types::EngineError;

/// Rows returned by either engine, already rendered to text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub trait NativeEngine {
    /// Submits one query; a rejection carries the engine's message verbatim.
    fn submit(&self, query: &NativeQuery) -> Result<ResultSet, EngineError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributedResult {
    pub rows: ResultSet,
    pub errors: Vec<String>,
}

impl DistributedResult {
    #[must_use]
    pub fn succeeded(rows: ResultSet) -> Self {
        Self {
            rows,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            rows: ResultSet::empty(),
            errors,
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub trait DistributedEngine {
    fn submit(&self, statement: &ValidatedStatement) -> DistributedResult;
}

impl<T: NativeEngine + ?Sized> NativeEngine for &T {
    fn submit(&self, query: &NativeQuery) -> Result<ResultSet, EngineError> {
        (**self).submit(query)
    }
}

impl<T: DistributedEngine + ?Sized> DistributedEngine for &T {
    fn submit(&self, statement: &ValidatedStatement) -> DistributedResult {
        (**self).submit(statement)
    }
}
