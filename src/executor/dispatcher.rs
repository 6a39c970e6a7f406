use tracing::{debug, error, info};

use super::annotate::annotate;
use super::engine::{DistributedEngine, NativeEngine, ResultSet};
use super::planner::plan;
use super::result::{render_result, RenderedError, RenderedResult};
use super::translate::{Attempt, ExecutionHints};
use super::validate::ValidatedStatement;
use crate::config::FrontendConfig;
use crate::types::{EngineError, FrontendError};

enum State {
    NativeAttempt(ExecutionHints),
    DistributedAttempt,
}

enum NativeOutcome {
    Succeeded(ResultSet),
    NeedsFiltering { query: String, message: String },
    Unsupported,
}

/// Runs validated statements: native first, one retry with the filtering
/// hint, then the distributed engine for operations the native side lacks.
pub struct Executor<'a, N: ?Sized, D: ?Sized> {
    native: &'a N,
    distributed: &'a D,
    config: &'a FrontendConfig,
}

impl<'a, N, D> Executor<'a, N, D>
where
    N: NativeEngine + ?Sized,
    D: DistributedEngine + ?Sized,
{
    pub const fn new(native: &'a N, distributed: &'a D, config: &'a FrontendConfig) -> Self {
        Self {
            native,
            distributed,
            config,
        }
    }

    /// Executes `statement` and renders its result.
    ///
    /// # Errors
    ///
    /// Returns a `RenderedError` when both paths are exhausted: a native
    /// rejection that is neither retryable nor unsupported (annotated and
    /// planned), a transport failure, or distributed errors.
    pub fn execute(&self, statement: &ValidatedStatement) -> Result<RenderedResult, RenderedError> {
        let mut state = State::NativeAttempt(ExecutionHints::default());

        loop {
            state = match state {
                State::NativeAttempt(hints) => {
                    match self.native_attempt(&Attempt::new(statement, hints))? {
                        NativeOutcome::Succeeded(rows) => {
                            return Ok(render_result(statement.statement(), &rows));
                        }
                        NativeOutcome::NeedsFiltering { query, message }
                            if hints.allow_filtering
                                || !statement.statement().accepts_filtering_hint() =>
                        {
                            return Err(self.native_failure(&Attempt::new(statement, hints), &query, message));
                        }
                        NativeOutcome::NeedsFiltering { .. } => {
                            info!("Executing again including ALLOW FILTERING");
                            State::NativeAttempt(hints.with_allow_filtering())
                        }
                        NativeOutcome::Unsupported => State::DistributedAttempt,
                    }
                }
                State::DistributedAttempt => return self.distributed_attempt(statement),
            };
        }
    }

    fn native_attempt(&self, attempt: &Attempt<'_>) -> Result<NativeOutcome, RenderedError> {
        let query = match attempt.translate(self.config) {
            Ok(query) => query,
            Err(unsupported) => {
                info!("{unsupported}, executing on the distributed engine");
                return Ok(NativeOutcome::Unsupported);
            }
        };

        debug!(query = %query, "submitting to native engine");
        match self.native.submit(&query) {
            Ok(rows) => Ok(NativeOutcome::Succeeded(rows)),
            Err(EngineError::Rejected { message }) => {
                if self.config.is_filtering_rejection(&message) {
                    Ok(NativeOutcome::NeedsFiltering {
                        query: query.to_string(),
                        message,
                    })
                } else if self.config.is_unsupported_rejection(&message) {
                    info!("Native engine rejected the operation, executing on the distributed engine: {message}");
                    Ok(NativeOutcome::Unsupported)
                } else {
                    Err(self.native_failure(attempt, &query.to_string(), message))
                }
            }
            Err(EngineError::Transport(reason)) => {
                error!("Native engine transport failure: {reason}");
                Err(RenderedError::new(FrontendError::Transport(reason)))
            }
        }
    }

    fn native_failure(
        &self,
        attempt: &Attempt<'_>,
        query: &str,
        message: String,
    ) -> RenderedError {
        let annotation = annotate(query, &message, &self.config.position_marker);
        error!("{message}");
        if let Some(annotated) = &annotation.query {
            error!("{annotated}");
        }

        let steps = plan(attempt.statement, attempt.hints, self.config);
        for step in &steps {
            info!("{step}");
        }

        RenderedError {
            error: FrontendError::NativeRejection { message },
            annotated_query: annotation.query,
            plan: steps,
        }
    }

    fn distributed_attempt(
        &self,
        statement: &ValidatedStatement,
    ) -> Result<RenderedResult, RenderedError> {
        let result = self.distributed.submit(statement);
        if result.has_errors() {
            for message in &result.errors {
                error!("Distributed execution error: {message}");
            }
            return Err(RenderedError::new(FrontendError::DistributedFailure(result.errors)));
        }
        Ok(render_result(statement.statement(), &result.rows))
    }
}
