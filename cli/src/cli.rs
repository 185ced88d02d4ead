// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 出力フォーマット
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// Shale - SQLite Schema Synchronization CLI
///
/// Keep a live SQLite database in sync with declarative .sql schema files.
#[derive(Parser, Debug)]
#[command(name = "shale")]
#[command(author = "Shale Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Declarative schema synchronization for SQLite")]
#[command(long_about = "Shale - SQLite Schema Synchronization CLI

Declare the desired schema as plain .sql files, then let shale compute and
apply the DDL needed to take a live database there, preserving row data
wherever SQLite allows.

Shale helps you:
  • Describe schemas as CREATE TABLE/INDEX/VIEW/TRIGGER source files
  • Inspect the exact migration plan before touching the database
  • Apply changes in a single transaction with a foreign-key check
  • Keep destructive changes gated behind an explicit flag
  • Export an existing database schema back to .sql files")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Initialize a project:      shale init
  2. Describe your schema:      Edit files in schema/ directory
  3. Review the plan:           shale diff --database app.db
  4. Apply it:                  shale apply --database app.db

For detailed help on each command, use: shale <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show schema differences between database and schema files
    ///
    /// Extracts the current schema from the database, loads the target
    /// schema from .sql files and prints the ordered migration plan.
    ///
    /// EXAMPLES:
    ///   # Human-readable diff
    ///   shale diff --database app.db
    ///
    ///   # Full migration script
    ///   shale diff --database app.db --sql
    Diff {
        /// Path to SQLite database file
        #[arg(short, long, value_name = "PATH")]
        database: Option<PathBuf>,

        /// Path to schema directory containing .sql files
        #[arg(short, long, value_name = "DIR")]
        schema: Option<PathBuf>,

        /// Output migration SQL instead of human-readable diff
        #[arg(long)]
        sql: bool,
    },

    /// Apply schema changes to database
    ///
    /// Computes the migration plan and executes it inside a single
    /// transaction. Destructive changes (table drops and recreations)
    /// are refused unless --allow-destructive or --skip-destructive
    /// is given.
    ///
    /// EXAMPLES:
    ///   # Preview without executing
    ///   shale apply --database app.db --dry-run
    ///
    ///   # Apply including destructive changes, with a backup
    ///   shale apply --database app.db --allow-destructive --backup app.db.backup
    Apply {
        /// Path to SQLite database file
        #[arg(short, long, value_name = "PATH")]
        database: Option<PathBuf>,

        /// Path to schema directory containing .sql files
        #[arg(short, long, value_name = "DIR")]
        schema: Option<PathBuf>,

        /// Show what would be applied without making changes
        #[arg(long)]
        dry_run: bool,

        /// Skip destructive changes (drops, table recreations)
        #[arg(long)]
        skip_destructive: bool,

        /// Allow destructive changes to run
        #[arg(long)]
        allow_destructive: bool,

        /// Create backup at PATH before applying changes
        #[arg(long, value_name = "PATH")]
        backup: Option<String>,
    },

    /// Dump database schema to files
    ///
    /// Writes tables.sql, indexes.sql, views.sql and triggers.sql into
    /// the output directory. The result can be used as a schema directory.
    Dump {
        /// Path to SQLite database file
        #[arg(short, long, value_name = "PATH")]
        database: Option<PathBuf>,

        /// Output directory for schema files
        #[arg(short, long, value_name = "DIR", default_value = "out")]
        output: PathBuf,
    },

    /// Initialize a new project configuration
    ///
    /// Creates .shale.yaml and the schema/ directory.
    Init {
        /// Force initialization even if config exists
        #[arg(short, long)]
        force: bool,
    },
}
