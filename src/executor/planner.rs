use std::fmt::{self, Display, Formatter};

use super::translate::{column_change_cql, Attempt, BuiltStatement, ExecutionHints};
use super::validate::ValidatedStatement;
use crate::config::FrontendConfig;
use crate::parser::{AlterTableOperation, Operator, Relation, Statement};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPath {
    Native,
    Distributed,
}

impl Display for ExecutionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Native => "Native",
            Self::Distributed => "Distributed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStep {
    pub path: ExecutionPath,
    pub query: String,
}

impl ExecutionStep {
    fn native(query: impl Into<String>) -> Self {
        Self {
            path: ExecutionPath::Native,
            query: query.into(),
        }
    }

    fn distributed(query: impl Into<String>) -> Self {
        Self {
            path: ExecutionPath::Distributed,
            query: query.into(),
        }
    }
}

impl Display for ExecutionStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-->{}", self.path, self.query)
    }
}

// Product of the list lengths; `None` on overflow
fn combination_count(lengths: impl IntoIterator<Item = usize>) -> Option<usize> {
    lengths.into_iter().try_fold(1usize, usize::checked_mul)
}

fn in_list_lengths(filter: &[Relation]) -> impl Iterator<Item = usize> + '_ {
    filter.iter().filter_map(|relation| match relation {
        Relation::In { values, .. } => Some(values.len()),
        Relation::Compare { .. } => None,
    })
}

/// Rewrites every `IN` relation into equalities, one filter per combination.
fn expand_in_relations(filter: &[Relation]) -> Vec<Vec<Relation>> {
    let mut combinations: Vec<Vec<Relation>> = vec![Vec::new()];
    for relation in filter {
        match relation {
            Relation::In { column, values } => {
                combinations = combinations
                    .into_iter()
                    .flat_map(|prefix| {
                        values.iter().map(move |value| {
                            let mut next = prefix.clone();
                            next.push(Relation::Compare {
                                column: column.clone(),
                                op: Operator::Eq,
                                value: value.clone(),
                            });
                            next
                        })
                    })
                    .collect();
            }
            Relation::Compare { .. } => {
                for combination in &mut combinations {
                    combination.push(relation.clone());
                }
            }
        }
    }
    combinations
}

/// Describes how a statement would be executed, step by step.
///
/// Plans are informational: they are attached to failures and logged, never run.
/// `hints` are the ones the native query was (or would be) submitted with.
/// A DELETE whose `IN` lists expand past `config.max_plan_steps` is listed as
/// the single query that was submitted.
#[must_use]
pub fn plan(
    statement: &ValidatedStatement,
    hints: ExecutionHints,
    config: &FrontendConfig,
) -> Vec<ExecutionStep> {
    let native = || match Attempt::new(statement, hints).translate(config) {
        Ok(query) => vec![ExecutionStep::native(query.to_string())],
        Err(_) => vec![ExecutionStep::distributed(statement.statement().to_string())],
    };

    match statement.statement() {
        Statement::AlterTable {
            name,
            operation: AlterTableOperation::Columns(changes),
        } => changes
            .iter()
            .map(|change| ExecutionStep::native(column_change_cql(name, change)))
            .collect(),
        Statement::Delete {
            columns,
            from,
            filter,
        } if filter.iter().any(|r| matches!(r, Relation::In { .. })) => {
            match combination_count(in_list_lengths(filter)) {
                Some(count) if count <= config.max_plan_steps => expand_in_relations(filter)
                    .into_iter()
                    .map(|filter| {
                        let built = BuiltStatement::Delete {
                            columns: columns.clone(),
                            from: from.clone(),
                            filter,
                        };
                        ExecutionStep::native(built.to_string())
                    })
                    .collect(),
                count => {
                    debug!(
                        combinations = ?count,
                        limit = config.max_plan_steps,
                        "IN lists not expanded in plan"
                    );
                    native()
                }
            }
        }
        Statement::Select {
            from,
            join: Some(join),
            ..
        } => vec![
            ExecutionStep::native(format!("SELECT * FROM {from}")),
            ExecutionStep::native(format!("SELECT * FROM {}", join.table)),
            ExecutionStep::distributed(statement.statement().to_string()),
        ],
        Statement::AddResource { .. }
        | Statement::ListResources { .. }
        | Statement::RemoveResource { .. }
        | Statement::StopProcess { .. }
        | Statement::CreateTrigger { .. }
        | Statement::DropTrigger { .. } => {
            vec![ExecutionStep::distributed(statement.statement().to_string())]
        }
        Statement::CreateKeyspace { .. }
        | Statement::CreateTable { .. }
        | Statement::AlterTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::DropIndex { .. }
        | Statement::Delete { .. }
        | Statement::Update { .. }
        | Statement::Select { .. } => native(),
    }
}
