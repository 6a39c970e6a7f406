use clap::{Parser, Subcommand};
use polyql::executor::{plan, validate, Attempt, ExecutionHints};
use polyql::index::extract_index_metadata;
use polyql::parser::parse_query;
use polyql::types::{ColumnRef, QualifiedName, SchemaCatalog};
use polyql::FrontendConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// polyql statement inspector
#[derive(Parser, Debug)]
#[command(name = "polyql")]
#[command(about = "Parse, validate and plan polyql statements", long_about = None)]
struct Args {
    /// Configuration file (defaults to ./polyql.toml, then /etc/polyql/polyql.toml)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show canonical form, validation verdict, native translation and plan
    Check {
        statement: String,

        /// Schema snapshot as JSON
        #[arg(short = 's', long)]
        schema: Option<PathBuf>,
    },
    /// Extract per-field index descriptors from raw index options
    IndexMeta {
        raw_options: String,

        /// Column the options belong to, as table.column
        #[arg(long, default_value = "table.column")]
        column: String,
    },
}

fn check(
    statement: &str,
    schema: Option<&Path>,
    config: &FrontendConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match schema {
        Some(path) => SchemaCatalog::from_json(&std::fs::read_to_string(path)?)?,
        None => SchemaCatalog::new(),
    };

    let parsed = match parse_query(statement) {
        Ok(parsed) => parsed,
        Err(e) => {
            let marked = polyql::executor::render_with_marker(
                statement,
                e.line,
                e.column,
                &config.position_marker,
            );
            println!("Syntax error: {e}\n{marked}");
            return Ok(());
        }
    };
    println!("Canonical:  {}", parsed.statement);

    let validated = match validate(parsed, &catalog) {
        Ok(validated) => validated,
        Err(e) => {
            println!("Validation: {e}");
            return Ok(());
        }
    };
    println!("Validation: ok");

    match Attempt::new(&validated, ExecutionHints::default()).translate(config) {
        Ok(query) => println!("Native:     {query}"),
        Err(unsupported) => println!("Native:     {unsupported}"),
    }

    println!("Plan:");
    for step in plan(&validated, ExecutionHints::default(), config) {
        println!("  {step}");
    }
    Ok(())
}

fn index_meta(raw_options: &str, column: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (table, name) = column.rsplit_once('.').unwrap_or(("", column));
    let column = ColumnRef::new(QualifiedName::new(table), name);

    let descriptors = extract_index_metadata(&column, raw_options);
    println!("{}", serde_json::to_string_pretty(&descriptors)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = FrontendConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Check { statement, schema } => check(&statement, schema.as_deref(), &config),
        Command::IndexMeta { raw_options, column } => index_meta(&raw_options, &column),
    }
}
