// スキーマ適用サービス
//
// 変更計画を単一トランザクション内で実行します。
// 計画の文順がそのまま実行順であり、並べ替えは行いません。
// 外部キー制約はトランザクションに先立って無効化し、
// コミット前に PRAGMA foreign_key_check で整合性を検証します。
// 計画は全体がコミットされるか、全体がロールバックされるかのいずれかです。

use crate::core::error::ApplyError;
use crate::core::schema_diff::Change;
use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;
use tracing::debug;

/// 適用オプション
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// 計画のみ作成し、実行しない
    pub dry_run: bool,

    /// destructiveフラグの立った変更を除外して適用する
    pub skip_destructive: bool,

    /// 適用前バックアップの出力先（Noneまたは空ならバックアップしない）
    pub backup_path: Option<String>,
}

/// 適用結果の概要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyOutcome {
    /// 適用した変更数
    pub applied: usize,

    /// skip_destructive で除外した変更数
    pub skipped: usize,
}

/// スキーマ適用サービス
#[derive(Debug, Clone, Default)]
pub struct SchemaApplierService;

impl SchemaApplierService {
    /// 新しいSchemaApplierServiceを作成
    pub fn new() -> Self {
        Self
    }

    /// 変更計画を適用
    ///
    /// バックアップ → 外部キー無効化 → トランザクション開始 →
    /// 各変更のSQL文を順に実行 → 外部キー整合性チェック → コミット。
    /// チェックで違反行が検出された場合、および文の実行に失敗した場合は
    /// ロールバックします。
    pub async fn apply(
        &self,
        conn: &mut SqliteConnection,
        changes: &[Change],
        options: &ApplyOptions,
    ) -> Result<ApplyOutcome, ApplyError> {
        let mut outcome = ApplyOutcome::default();

        let filtered: Vec<&Change> = if options.skip_destructive {
            let kept: Vec<&Change> = changes.iter().filter(|c| !c.destructive).collect();
            outcome.skipped = changes.len() - kept.len();
            kept
        } else {
            changes.iter().collect()
        };

        if options.dry_run || filtered.is_empty() {
            return Ok(outcome);
        }

        // バックアップはトランザクション開始前に完了していなければならない
        if let Some(backup_path) = options.backup_path.as_deref() {
            if !backup_path.is_empty() {
                self.backup(conn, backup_path).await?;
            }
        }

        // PRAGMA foreign_keys はトランザクション外でのみ効果を持つ
        execute_pragma(conn, "PRAGMA foreign_keys = OFF", "Failed to disable foreign keys")
            .await?;

        let mut tx = conn.begin().await.map_err(|e| ApplyError::Transaction {
            message: "Failed to begin transaction".to_string(),
            cause: e.to_string(),
        })?;

        for change in &filtered {
            debug!(change = %change.description, "Applying change");
            for statement in &change.sql {
                let statement = statement.trim();
                if statement.is_empty() || statement.starts_with("--") {
                    continue;
                }

                sqlx::query(statement)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| ApplyError::Statement {
                        description: change.description.clone(),
                        sql: statement.to_string(),
                        cause: e.to_string(),
                    })?;
            }
            outcome.applied += 1;
        }

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&mut *tx)
            .await
            .map_err(|e| ApplyError::Transaction {
                message: "Failed to re-enable foreign keys".to_string(),
                cause: e.to_string(),
            })?;

        let violations = sqlx::query("PRAGMA foreign_key_check")
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| ApplyError::Transaction {
                message: "Failed to run foreign key check".to_string(),
                cause: e.to_string(),
            })?;

        if !violations.is_empty() {
            // txはドロップ時にロールバックされる
            return Err(ApplyError::ForeignKeyViolation {
                violations: violations.len(),
            });
        }

        tx.commit().await.map_err(|e| ApplyError::Transaction {
            message: "Failed to commit transaction".to_string(),
            cause: e.to_string(),
        })?;

        execute_pragma(conn, "PRAGMA foreign_keys = ON", "Failed to re-enable foreign keys")
            .await?;

        Ok(outcome)
    }

    /// VACUUM INTO で適用前バックアップを作成
    ///
    /// 既存のバックアップファイルは先に削除します。
    /// パス中のシングルクォートは二重化してエスケープします。
    async fn backup(&self, conn: &mut SqliteConnection, path: &str) -> Result<(), ApplyError> {
        if std::path::Path::new(path).exists() {
            std::fs::remove_file(path).map_err(|e| ApplyError::Backup {
                path: path.to_string(),
                cause: e.to_string(),
            })?;
        }

        let escaped = path.replace('\'', "''");
        let statement = format!("VACUUM INTO '{}'", escaped);

        sqlx::query(&statement)
            .execute(&mut *conn)
            .await
            .map_err(|e| ApplyError::Backup {
                path: path.to_string(),
                cause: e.to_string(),
            })?;

        Ok(())
    }
}

async fn execute_pragma(
    conn: &mut SqliteConnection,
    pragma: &str,
    message: &str,
) -> Result<(), ApplyError> {
    sqlx::query(pragma)
        .execute(&mut *conn)
        .await
        .map(|_| ())
        .map_err(|e| ApplyError::Transaction {
            message: message.to_string(),
            cause: e.to_string(),
        })
}
