// スキーマ同期ファサード
//
// データベースとスキーマディレクトリの比較、および計画適用を
// 1つの入口へ集約します。CLIと組み込み利用の両方から使われます。

use crate::adapters::database::DatabaseConnectionService;
use crate::core::diff_planner::SchemaDiffPlanner;
use crate::core::schema_diff::Change;
use crate::services::schema_applier::{ApplyOptions, ApplyOutcome, SchemaApplierService};
use crate::services::schema_extractor::SchemaExtractorService;
use crate::services::schema_loader::SchemaLoaderService;
use anyhow::{Context, Result};
use std::path::Path;

/// スキーマ同期サービス
#[derive(Debug, Clone, Default)]
pub struct SchemaSyncService;

impl SchemaSyncService {
    /// 新しいSchemaSyncServiceを作成
    pub fn new() -> Self {
        Self
    }

    /// データベースとスキーマディレクトリを比較して変更計画を返す
    pub async fn compare(&self, db_path: &Path, schema_dir: &Path) -> Result<Vec<Change>> {
        let connections = DatabaseConnectionService::new();
        let mut conn = connections
            .connect(db_path)
            .await
            .context("Failed to open database")?;

        let extractor = SchemaExtractorService::new();
        let current = extractor
            .extract(&mut conn)
            .await
            .context("Failed to extract database schema")?;

        let loader = SchemaLoaderService::new();
        let target = loader
            .from_dir(schema_dir)
            .await
            .context("Failed to load schema files")?;

        let planner = SchemaDiffPlanner::new();
        Ok(planner.plan(&current, &target))
    }

    /// 2つのデータベース同士を比較して変更計画を返す
    pub async fn compare_databases(
        &self,
        from_path: &Path,
        to_path: &Path,
    ) -> Result<Vec<Change>> {
        let connections = DatabaseConnectionService::new();
        let extractor = SchemaExtractorService::new();

        let mut from_conn = connections
            .connect(from_path)
            .await
            .context("Failed to open source database")?;
        let from = extractor
            .extract(&mut from_conn)
            .await
            .context("Failed to extract source schema")?;

        let mut to_conn = connections
            .connect(to_path)
            .await
            .context("Failed to open target database")?;
        let to = extractor
            .extract(&mut to_conn)
            .await
            .context("Failed to extract target schema")?;

        let planner = SchemaDiffPlanner::new();
        Ok(planner.plan(&from, &to))
    }

    /// スキーマディレクトリの内容をデータベースへ適用する
    ///
    /// 計画と適用結果を返します。変更がない場合は何も実行しません。
    pub async fn apply(
        &self,
        db_path: &Path,
        schema_dir: &Path,
        options: &ApplyOptions,
    ) -> Result<(Vec<Change>, ApplyOutcome)> {
        let changes = self.compare(db_path, schema_dir).await?;
        if changes.is_empty() {
            return Ok((changes, ApplyOutcome::default()));
        }

        let connections = DatabaseConnectionService::new();
        let mut conn = connections
            .connect(db_path)
            .await
            .context("Failed to open database")?;

        let applier = SchemaApplierService::new();
        let outcome = applier.apply(&mut conn, &changes, options).await?;

        Ok((changes, outcome))
    }
}
