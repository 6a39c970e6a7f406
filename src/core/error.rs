use thiserror::Error;

/// Parser failure with a 1-based line and a 0-based column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}:{column} {detail}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub detail: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Keyspace '{0}' not found")]
    KeyspaceNotFound(String),
    #[error("Keyspace '{0}' already exists")]
    KeyspaceAlreadyExists(String),
    #[error("Table '{0}' not found")]
    TableNotFound(String),
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },
    #[error("Column '{column}' already exists in table '{table}'")]
    ColumnAlreadyExists { table: String, column: String },
    #[error("Column '{0}' is declared more than once")]
    DuplicateColumn(String),
    #[error("Primary key references column '{0}' which is not defined in the statement")]
    UndeclaredPrimaryKeyColumn(String),
    #[error("Primary key must be declared exactly once, found {0} declarations")]
    PrimaryKeyCount(usize),
    #[error("Index '{0}' already exists")]
    IndexAlreadyExists(String),
    #[error("Index '{0}' not found")]
    IndexNotFound(String),
    #[error("Custom index requires a USING class")]
    MissingIndexClass,
    #[error("Index options require a USING class or a CUSTOM/FULLTEXT index")]
    OptionsWithoutIndexClass,
    #[error("Option '{name}' expects a {expected} value, found '{found}'")]
    IncompatibleOption {
        name: String,
        expected: &'static str,
        found: String,
    },
    #[error("Resource locator must not be empty")]
    EmptyLocator,
}

/// Failure reported by the native engine collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{message}")]
    Rejected { message: String },
    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Terminal failure of one statement cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrontendError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Native engine rejection: {message}")]
    NativeRejection { message: String },
    #[error("Distributed execution failed: {}", .0.join("; "))]
    DistributedFailure(Vec<String>),
    #[error("Transport error: {0}")]
    Transport(String),
}
