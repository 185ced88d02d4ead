// データベース接続アダプター
//
// SQLxを使用したSQLite接続の管理を行います。
// 計画適用は単一の排他的接続で行うため、プールではなく
// 個別のコネクションを払い出します。

use crate::core::error::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::ConnectOptions;
use std::path::Path;
use std::str::FromStr;

/// データベース接続サービス
#[derive(Debug, Clone, Default)]
pub struct DatabaseConnectionService;

impl DatabaseConnectionService {
    /// 新しいDatabaseConnectionServiceを作成
    pub fn new() -> Self {
        Self
    }

    /// ファイル上のSQLiteデータベースへ接続
    ///
    /// ファイルが存在しない場合は新規作成されます。
    ///
    /// # Arguments
    ///
    /// * `path` - SQLiteデータベースファイルのパス
    ///
    /// # Returns
    ///
    /// コネクションまたはエラー
    pub async fn connect(&self, path: &Path) -> Result<SqliteConnection, DatabaseError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        options
            .connect()
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("Failed to open database: {}", path.display()),
                cause: e.to_string(),
            })
    }

    /// インメモリSQLiteデータベースへ接続
    ///
    /// スキーマファイルの実行やテストで使用します。
    /// コネクションを閉じると内容は消えます。
    pub async fn connect_in_memory(&self) -> Result<SqliteConnection, DatabaseError> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
                DatabaseError::Connection {
                    message: "Failed to build in-memory connection options".to_string(),
                    cause: e.to_string(),
                }
            })?;

        options
            .connect()
            .await
            .map_err(|e| DatabaseError::Connection {
                message: "Failed to open in-memory database".to_string(),
                cause: e.to_string(),
            })
    }
}
