// dumpコマンドハンドラー
//
// データベースのスキーマを宣言的な.sqlファイル群として書き出します。
// 出力ディレクトリはそのままスキーマディレクトリとして利用できます。

use crate::adapters::database::DatabaseConnectionService;
use crate::cli::command_context::CommandContext;
use crate::cli::OutputFormat;
use crate::services::schema_dumper::SchemaDumperService;
use crate::services::schema_extractor::SchemaExtractorService;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// dumpコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct DumpCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// データベースファイルパス
    pub database: Option<PathBuf>,
    /// 出力ディレクトリ
    pub output_dir: PathBuf,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// dumpコマンドハンドラー
#[derive(Debug, Default)]
pub struct DumpCommandHandler;

impl DumpCommandHandler {
    /// 新しいDumpCommandHandlerを作成
    pub fn new() -> Self {
        Self
    }

    /// dumpコマンドを実行
    pub async fn execute(&self, command: &DumpCommand) -> Result<String> {
        let context =
            CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let database = context.resolve_database(command.database.as_deref())?;

        let connections = DatabaseConnectionService::new();
        let mut conn = connections
            .connect(&database)
            .await
            .context("Failed to open database")?;

        let extractor = SchemaExtractorService::new();
        let snapshot = extractor
            .extract(&mut conn)
            .await
            .context("Failed to extract database schema")?;

        let dumper = SchemaDumperService::new();
        let summary = dumper.dump(&snapshot, &command.output_dir)?;

        if command.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&summary)?);
        }

        Ok(format!(
            "Schema dumped to {}/\n  Tables: {}\n  Indexes: {}\n  Views: {}\n  Triggers: {}",
            command.output_dir.display(),
            summary.tables,
            summary.indexes,
            summary.views,
            summary.triggers
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_command_handler() {
        let handler = DumpCommandHandler::new();
        assert!(format!("{:?}", handler).contains("DumpCommandHandler"));
    }
}
