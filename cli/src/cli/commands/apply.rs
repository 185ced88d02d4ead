// applyコマンドハンドラー
//
// 変更計画の適用機能を実装します。
// - 計画の算出と表示
// - 破壊的変更のゲート（--allow-destructive / --skip-destructive）
// - dry-runモード
// - 適用前バックアップと単一トランザクションでの実行

use crate::adapters::database::DatabaseConnectionService;
use crate::cli::command_context::CommandContext;
use crate::cli::commands::change_formatter::ChangeFormatter;
use crate::cli::OutputFormat;
use crate::core::schema_diff::{has_destructive, Change};
use crate::services::schema_applier::{ApplyOptions, SchemaApplierService};
use crate::services::schema_sync::SchemaSyncService;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::PathBuf;

/// applyコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ApplyCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// データベースファイルパス
    pub database: Option<PathBuf>,
    /// スキーマディレクトリ
    pub schema: Option<PathBuf>,
    /// Dry run - 実行せずに計画を表示
    pub dry_run: bool,
    /// 破壊的変更を除外して適用
    pub skip_destructive: bool,
    /// 破壊的変更を許可
    pub allow_destructive: bool,
    /// 適用前バックアップの出力先
    pub backup: Option<String>,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// JSONモード用の適用レポート
#[derive(Debug, Serialize)]
struct ApplyReport<'a> {
    changes: &'a [Change],
    applied: usize,
    skipped: usize,
    dry_run: bool,
}

/// applyコマンドハンドラー
#[derive(Debug, Default)]
pub struct ApplyCommandHandler;

impl ApplyCommandHandler {
    /// 新しいApplyCommandHandlerを作成
    pub fn new() -> Self {
        Self
    }

    /// applyコマンドを実行
    pub async fn execute(&self, command: &ApplyCommand) -> Result<String> {
        let context =
            CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let database = context.resolve_database(command.database.as_deref())?;
        let schema_dir = context.resolve_schema_dir(command.schema.as_deref())?;

        let sync = SchemaSyncService::new();
        let changes = sync.compare(&database, &schema_dir).await?;

        if changes.is_empty() {
            if command.format == OutputFormat::Json {
                let report = ApplyReport {
                    changes: &changes,
                    applied: 0,
                    skipped: 0,
                    dry_run: command.dry_run,
                };
                return Ok(serde_json::to_string_pretty(&report)?);
            }
            return Ok("No schema changes detected.".to_string());
        }

        let formatter = ChangeFormatter::new();

        // 破壊的変更のゲート: 明示的に許可されるか除外されるまで実行しない
        if has_destructive(&changes)
            && !command.allow_destructive
            && !command.skip_destructive
            && !command.dry_run
        {
            return Err(anyhow!(
                formatter.format_destructive_error(&changes, "shale apply")
            ));
        }

        if command.dry_run {
            if command.format == OutputFormat::Json {
                let report = ApplyReport {
                    changes: &changes,
                    applied: 0,
                    skipped: 0,
                    dry_run: true,
                };
                return Ok(serde_json::to_string_pretty(&report)?);
            }
            let mut output = formatter.format_changes(&changes);
            output.push_str("\nDry run - no changes applied.\n");
            return Ok(output);
        }

        let options = ApplyOptions {
            dry_run: false,
            skip_destructive: command.skip_destructive,
            backup_path: context.resolve_backup_path(command.backup.as_deref()),
        };

        let connections = DatabaseConnectionService::new();
        let mut conn = connections.connect(&database).await?;
        let applier = SchemaApplierService::new();
        let outcome = applier.apply(&mut conn, &changes, &options).await?;

        if command.format == OutputFormat::Json {
            let report = ApplyReport {
                changes: &changes,
                applied: outcome.applied,
                skipped: outcome.skipped,
                dry_run: false,
            };
            return Ok(serde_json::to_string_pretty(&report)?);
        }

        let mut output = String::new();
        let warning = formatter.format_destructive_warning(&changes);
        if command.allow_destructive && !warning.is_empty() {
            output.push_str(&warning);
            output.push('\n');
        }
        output.push_str(&formatter.format_changes(&changes));
        if outcome.skipped > 0 {
            output.push_str(&format!(
                "\nSkipped {} destructive change(s).\n",
                outcome.skipped
            ));
        }
        output.push_str("\nSchema changes applied successfully!\n");

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_command_handler() {
        let handler = ApplyCommandHandler::new();
        assert!(format!("{:?}", handler).contains("ApplyCommandHandler"));
    }
}
