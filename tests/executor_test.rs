// Statement cycle through the front end with scripted engines
use std::collections::VecDeque;
use std::sync::Mutex;

use polyql::executor::{
    annotate, DistributedEngine, DistributedResult, ExecutionPath, LocatedError, NativeEngine,
    NativeQuery, ResultSet, ValidatedStatement,
};
use polyql::types::{ColumnMetadata, EngineError, FrontendError, SchemaCatalog, TableMetadata};
use polyql::{Frontend, FrontendConfig};

#[derive(Default)]
struct MockNative {
    replies: Mutex<VecDeque<Result<ResultSet, EngineError>>>,
    submitted: Mutex<Vec<String>>,
}

impl MockNative {
    fn replying(replies: Vec<Result<ResultSet, EngineError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

impl NativeEngine for MockNative {
    fn submit(&self, query: &NativeQuery) -> Result<ResultSet, EngineError> {
        self.submitted.lock().unwrap().push(query.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ResultSet::empty()))
    }
}

#[derive(Default)]
struct MockDistributed {
    submitted: Mutex<Vec<String>>,
    reply: Option<DistributedResult>,
}

impl MockDistributed {
    fn count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

impl DistributedEngine for MockDistributed {
    fn submit(&self, statement: &ValidatedStatement) -> DistributedResult {
        self.submitted.lock().unwrap().push(statement.statement().to_string());
        self.reply.clone().unwrap_or_default()
    }
}

fn catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new().with_current_keyspace("app");
    catalog.add_table(
        "app",
        TableMetadata::new(
            "users",
            vec![
                ColumnMetadata::new("id", "int"),
                ColumnMetadata::new("name", "text"),
            ],
        ),
    );
    catalog.add_table(
        "app",
        TableMetadata::new(
            "orders",
            vec![ColumnMetadata::new("id", "int"), ColumnMetadata::new("user_id", "int")],
        ),
    );
    catalog
}

fn rejected(message: &str) -> Result<ResultSet, EngineError> {
    Err(EngineError::Rejected {
        message: message.to_string(),
    })
}

const FILTERING_MESSAGE: &str = "line 3:10 mismatched input ... ALLOW FILTERING required";

#[test]
fn test_filtering_rejection_retries_exactly_once() {
    let native = MockNative::replying(vec![
        rejected(FILTERING_MESSAGE),
        Ok(ResultSet::new(
            vec!["id".to_string(), "name".to_string()],
            vec![vec!["1".to_string(), "ann".to_string()]],
        )),
    ]);
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let result = frontend
        .execute("SELECT *\nFROM users\nWHERE name = 'ann';")
        .unwrap();

    let submitted = native.submitted();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0], "SELECT * FROM users WHERE name = 'ann'");
    assert_eq!(submitted[1], "SELECT * FROM users WHERE name = 'ann' ALLOW FILTERING");
    assert!(result.text.contains("ann"));
    assert!(result.text.ends_with("(1 rows)"));
    assert_eq!(distributed.count(), 0);
}

#[test]
fn test_filtering_message_marks_row_and_column() {
    let query = "SELECT *\nFROM users\nWHERE name = 'ann'";
    let annotation = annotate(query, FILTERING_MESSAGE, "^");

    assert_eq!(
        annotation.error,
        LocatedError::Located {
            line: 3,
            column: 10,
            detail: "mismatched input ... ALLOW FILTERING required".to_string(),
        }
    );
    assert_eq!(
        annotation.query.as_deref(),
        Some("SELECT *\nFROM users\nWHERE name^ = 'ann'")
    );
}

#[test]
fn test_repeated_filtering_rejection_fails_with_plan() {
    let native = MockNative::replying(vec![rejected(FILTERING_MESSAGE), rejected(FILTERING_MESSAGE)]);
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let err = frontend.execute("SELECT * FROM users WHERE name = 'ann'").unwrap_err();

    assert_eq!(native.submitted().len(), 2);
    assert_eq!(
        err.error,
        FrontendError::NativeRejection {
            message: FILTERING_MESSAGE.to_string()
        }
    );
    assert!(err.annotated_query.is_some());
    assert_eq!(err.plan.len(), 1);
    assert_eq!(err.plan[0].path, ExecutionPath::Native);
    assert_eq!(
        err.plan[0].to_string(),
        "Native-->SELECT * FROM users WHERE name = 'ann' ALLOW FILTERING"
    );
    assert_eq!(distributed.count(), 0);
}

#[test]
fn test_unsupported_operation_goes_distributed_once() {
    let native = MockNative::replying(vec![rejected("Unsupported operation: secondary index scan")]);
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let result = frontend.execute("SELECT id FROM users WHERE name = 'ann'");

    assert!(result.is_ok());
    assert_eq!(native.submitted().len(), 1);
    assert_eq!(distributed.count(), 1);
}

#[test]
fn test_join_skips_native_engine() {
    let native = MockNative::default();
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let result = frontend.execute("SELECT * FROM users INNER JOIN orders ON users.id = orders.user_id");

    assert!(result.is_ok());
    assert!(native.submitted().is_empty());
    assert_eq!(distributed.count(), 1);
}

#[test]
fn test_other_rejection_is_terminal() {
    let native = MockNative::replying(vec![rejected("line 1:7 no viable alternative at input 'id'")]);
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let err = frontend.execute("SELECT id FROM users").unwrap_err();

    assert_eq!(native.submitted().len(), 1);
    assert_eq!(distributed.count(), 0);
    assert_eq!(err.annotated_query.as_deref(), Some("SELECT ^id FROM users"));
    assert_eq!(err.plan[0].to_string(), "Native-->SELECT id FROM users");
    let rendered = err.to_string();
    assert!(rendered.contains("SELECT ^id FROM users"));
    assert!(rendered.ends_with("Native-->SELECT id FROM users"));
}

#[test]
fn test_distributed_errors_are_reported() {
    let native = MockNative::default();
    let distributed = MockDistributed {
        submitted: Mutex::new(Vec::new()),
        reply: Some(DistributedResult::failed(vec!["process p1 not found".to_string()])),
    };
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let err = frontend.execute("STOP process p1").unwrap_err();

    assert_eq!(
        err.error,
        FrontendError::DistributedFailure(vec!["process p1 not found".to_string()])
    );
    assert!(native.submitted().is_empty());
}

#[test]
fn test_syntax_error_is_marked() {
    let native = MockNative::default();
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let err = frontend.execute("SELECT id FROM users WHERE").unwrap_err();

    assert!(matches!(err.error, FrontendError::Syntax(_)));
    assert_eq!(err.annotated_query.as_deref(), Some("SELECT id FROM users ^WHERE"));
    assert!(native.submitted().is_empty());
}

#[test]
fn test_validation_error_stops_before_engines() {
    let native = MockNative::default();
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let err = frontend.execute("SELECT age FROM users").unwrap_err();

    assert!(matches!(err.error, FrontendError::Validation(_)));
    assert!(err.plan.is_empty());
    assert!(native.submitted().is_empty());
    assert_eq!(distributed.count(), 0);
}

#[test]
fn test_ddl_success_echoes_statement() {
    let native = MockNative::default();
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let result = frontend.execute("alter table users add age int;").unwrap();

    assert_eq!(result.text, "\tAlter table users add age int");
    assert_eq!(native.submitted(), vec!["ALTER TABLE users ADD age int".to_string()]);
}

#[test]
fn test_custom_markers_from_config() {
    let native = MockNative::replying(vec![rejected("scan permission required"), Ok(ResultSet::empty())]);
    let distributed = MockDistributed::default();
    let config = FrontendConfig {
        filtering_marker: "scan permission".to_string(),
        ..FrontendConfig::default()
    };
    let frontend = Frontend::new(catalog(), &native, &distributed).with_config(config);

    assert!(frontend.execute("SELECT * FROM users WHERE name = 'x'").is_ok());
    assert_eq!(native.submitted().len(), 2);
}

#[test]
fn test_rejected_delete_plan_stays_bounded() {
    let native = MockNative::replying(vec![rejected("line 1:0 delete refused")]);
    let distributed = MockDistributed::default();
    let frontend = Frontend::new(catalog(), &native, &distributed);

    let values: Vec<String> = (0..12).map(|i| i.to_string()).collect();
    let list = values.join(", ");
    let sql = format!("DELETE FROM users WHERE id IN ({list}) AND name IN ({list}) AND id IN ({list})");
    let err = frontend.execute(&sql).unwrap_err();

    assert_eq!(err.plan.len(), 1);
    assert_eq!(err.plan[0].query, native.submitted()[0]);
}
