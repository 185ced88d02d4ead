// initコマンドハンドラー
//
// プロジェクトの初期化機能を実装します。
// - デフォルト設定ファイルの生成（.shale.yaml）
// - スキーマディレクトリの作成

use crate::cli::OutputFormat;
use crate::core::config::Config;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;

const CONFIG_TEMPLATE: &str = "# shale configuration
version: \"1.0\"

# Path to the SQLite database file (relative to the project root)
database: app.db

# Directory containing declarative .sql schema files
schema_dir: schema

# Uncomment to create a backup before every apply
# backup_path: app.db.backup
";

/// initコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InitCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 既存の設定があっても上書きする
    pub force: bool,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// initコマンドハンドラー
#[derive(Debug, Default)]
pub struct InitCommandHandler;

impl InitCommandHandler {
    /// 新しいInitCommandHandlerを作成
    pub fn new() -> Self {
        Self
    }

    /// initコマンドを実行
    pub fn execute(&self, command: &InitCommand) -> Result<String> {
        let config_path = command.project_path.join(Config::DEFAULT_CONFIG_PATH);

        if config_path.exists() && !command.force {
            return Err(anyhow!(
                "Config file already exists: {:?}. Use --force to overwrite.",
                config_path
            ));
        }

        fs::write(&config_path, CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        let schema_dir = command.project_path.join("schema");
        fs::create_dir_all(&schema_dir)
            .with_context(|| format!("Failed to create schema directory: {:?}", schema_dir))?;

        Ok(format!(
            "Initialized shale project.\n  Config: {}\n  Schema directory: {}",
            config_path.display(),
            schema_dir.display()
        ))
    }
}
