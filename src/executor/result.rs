use std::fmt::{self, Display, Formatter};

use comfy_table::{presets::UTF8_FULL, Cell, Table as ComfyTable};

use super::engine::ResultSet;
use super::planner::ExecutionStep;
use crate::parser::Statement;
use crate::types::FrontendError;

/// Text shown to the user for a successful statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    pub text: String,
}

impl Display for RenderedResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Failure of one statement with everything needed to display it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedError {
    pub error: FrontendError,
    /// Query text with the position marker, when the failure carried a position
    pub annotated_query: Option<String>,
    /// How the statement would have been executed; filled for native rejections
    pub plan: Vec<ExecutionStep>,
}

impl RenderedError {
    #[must_use]
    pub const fn new(error: FrontendError) -> Self {
        Self {
            error,
            annotated_query: None,
            plan: Vec::new(),
        }
    }
}

impl Display for RenderedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(query) = &self.annotated_query {
            write!(f, "\n{query}")?;
        }
        for step in &self.plan {
            write!(f, "\n{step}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RenderedError {}

fn render_rows(result: &ResultSet) -> String {
    if result.is_empty() {
        return "(0 rows)".to_string();
    }

    let mut table = ComfyTable::new();
    table.load_preset(UTF8_FULL);
    table.set_header(result.columns.iter().map(Cell::new));
    for row in &result.rows {
        table.add_row(row.iter().map(Cell::new));
    }

    format!("{table}\n({} rows)", result.rows.len())
}

/// Formats a successful result by the statement's own rule: rows for queries
/// and listings, the canonical statement text for everything else.
#[must_use]
pub fn render_result(statement: &Statement, result: &ResultSet) -> RenderedResult {
    let text = match statement {
        Statement::Select { .. } | Statement::ListResources { .. } => render_rows(result),
        Statement::CreateKeyspace { .. }
        | Statement::CreateTable { .. }
        | Statement::AlterTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::DropIndex { .. }
        | Statement::AddResource { .. }
        | Statement::RemoveResource { .. }
        | Statement::Delete { .. }
        | Statement::Update { .. }
        | Statement::StopProcess { .. }
        | Statement::CreateTrigger { .. }
        | Statement::DropTrigger { .. } => format!("\t{statement}"),
    };
    RenderedResult { text }
}
