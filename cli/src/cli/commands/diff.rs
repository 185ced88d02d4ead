// diffコマンドハンドラー
//
// データベースとスキーマディレクトリの差分表示機能を実装します。
// - 人間可読な変更一覧（デフォルト）
// - マイグレーションスクリプト全体の出力（--sql）
// - 変更リストのJSON出力（--format json）

use crate::cli::command_context::CommandContext;
use crate::cli::commands::change_formatter::ChangeFormatter;
use crate::cli::OutputFormat;
use crate::core::schema_diff::generate_script;
use crate::services::schema_sync::SchemaSyncService;
use anyhow::Result;
use std::path::PathBuf;

/// diffコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct DiffCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// データベースファイルパス
    pub database: Option<PathBuf>,
    /// スキーマディレクトリ
    pub schema: Option<PathBuf>,
    /// SQLスクリプトとして出力
    pub sql: bool,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// diffコマンドハンドラー
#[derive(Debug, Default)]
pub struct DiffCommandHandler;

impl DiffCommandHandler {
    /// 新しいDiffCommandHandlerを作成
    pub fn new() -> Self {
        Self
    }

    /// diffコマンドを実行
    pub async fn execute(&self, command: &DiffCommand) -> Result<String> {
        let context =
            CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let database = context.resolve_database(command.database.as_deref())?;
        let schema_dir = context.resolve_schema_dir(command.schema.as_deref())?;

        let sync = SchemaSyncService::new();
        let changes = sync.compare(&database, &schema_dir).await?;

        if command.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&changes)?);
        }

        if changes.is_empty() {
            return Ok("No schema changes detected.".to_string());
        }

        if command.sql {
            return Ok(generate_script(&changes));
        }

        Ok(ChangeFormatter::new().format_changes(&changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_command_handler() {
        let handler = DiffCommandHandler::new();
        assert!(format!("{:?}", handler).contains("DiffCommandHandler"));
    }
}
