// Module declarations
pub mod error;
pub mod value;
pub mod name;
pub mod metadata;

// Re-exports for convenience
pub use error::{ConfigError, EngineError, FrontendError, SyntaxError, ValidationError};
pub use value::Value;
pub use name::{ColumnRef, QualifiedName};
pub use metadata::{
    ColumnMetadata, IndexMetadata, KeyspaceMetadata, MetadataProvider, SchemaCatalog, TableMetadata,
};
