use anyhow::{Context, Result};
use clap::Parser;
use colored::control as color_control;
use shale::cli::commands::apply::{ApplyCommand, ApplyCommandHandler};
use shale::cli::commands::diff::{DiffCommand, DiffCommandHandler};
use shale::cli::commands::dump::{DumpCommand, DumpCommandHandler};
use shale::cli::commands::init::{InitCommand, InitCommandHandler};
use shale::cli::commands::ErrorOutput;
use shale::cli::{Cli, Commands, OutputFormat};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    // 非同期ランタイムを作成して実行
    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to create Tokio runtime")
        .unwrap_or_else(|e| {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        });

    let is_json = matches!(cli.format, OutputFormat::Json);
    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            if is_json {
                // JSON モードではエラーも構造化JSON形式で出力
                let error_output = ErrorOutput::new(format!("{:#}", e));
                eprintln!("{}", error_output.to_json());
            } else {
                eprintln!("Error: {:#}", e);
            }
            process::exit(1);
        }
    }
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    // --verbose フラグの処理: tracing subscriber を初期化
    // SHALE_LOG 環境変数が設定されている場合はそちらを優先する
    // 例: SHALE_LOG=info shale diff --database app.db
    let filter = if let Ok(env_filter) = env::var("SHALE_LOG") {
        EnvFilter::new(env_filter)
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    // try_init() を使用して二重登録時のパニックを防止
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    if cli.verbose {
        debug!("Verbose mode enabled");
    }

    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;

    // --config フラグの処理（絶対パスに変換）
    let config_path: Option<PathBuf> = cli.config.map(|p| {
        if p.is_absolute() {
            p
        } else {
            project_path.join(p)
        }
    });

    let format = cli.format;

    debug!(project_path = %project_path.display(), "Resolved project path");
    if let Some(ref cp) = config_path {
        debug!(config_path = %cp.display(), "Using custom config path");
    }

    match cli.command {
        Commands::Diff {
            database,
            schema,
            sql,
        } => {
            debug!(database = ?database, schema = ?schema, sql = sql, "Executing diff command");
            let handler = DiffCommandHandler::new();
            let command = DiffCommand {
                project_path,
                config_path,
                database,
                schema,
                sql,
                format,
            };
            handler.execute(&command).await
        }

        Commands::Apply {
            database,
            schema,
            dry_run,
            skip_destructive,
            allow_destructive,
            backup,
        } => {
            debug!(
                database = ?database,
                dry_run = dry_run,
                skip_destructive = skip_destructive,
                allow_destructive = allow_destructive,
                "Executing apply command"
            );
            let handler = ApplyCommandHandler::new();
            let command = ApplyCommand {
                project_path,
                config_path,
                database,
                schema,
                dry_run,
                skip_destructive,
                allow_destructive,
                backup,
                format,
            };
            handler.execute(&command).await
        }

        Commands::Dump { database, output } => {
            debug!(database = ?database, output = ?output, "Executing dump command");
            let handler = DumpCommandHandler::new();
            let command = DumpCommand {
                project_path,
                config_path,
                database,
                output_dir: output,
                format,
            };
            handler.execute(&command).await
        }

        Commands::Init { force } => {
            debug!(force = force, "Executing init command");
            let handler = InitCommandHandler::new();
            let command = InitCommand {
                project_path,
                force,
                format,
            };
            handler.execute(&command)
        }
    }
}
