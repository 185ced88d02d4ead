// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、DatabaseError, SchemaLoadError, ApplyError,
// IoError, ConfigError を定義します。
// 差分プランナー自体は整形されたスナップショットに対して全域的であり、
// 失敗経路を持ちません。

use thiserror::Error;

/// データベースエラー
///
/// データベースの接続・読み取りに失敗した場合のエラーを表現します。
#[derive(Debug, Clone, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Database connection error: {message} (cause: {cause})")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// 根本原因
        cause: String,
    },

    /// Query execution error
    #[error("Query execution error: {message} (cause: {cause})")]
    Query {
        /// エラーメッセージ
        message: String,
        /// 根本原因
        cause: String,
    },
}

/// スキーマ読み込みエラー
///
/// スキーマファイルの読み取り・実行に失敗した場合のエラーを表現します。
/// どのファイルで失敗したかを必ず保持します。
#[derive(Debug, Clone, Error)]
pub enum SchemaLoadError {
    /// ファイルI/Oの失敗
    #[error(transparent)]
    Io(#[from] IoError),

    /// スキーマファイルのSQL実行失敗
    #[error("Failed to execute schema file {file}: {cause}")]
    Execute {
        /// 失敗したファイル名
        file: String,
        /// SQLiteのエラーメッセージ
        cause: String,
    },

    /// スナップショット抽出の失敗
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// 適用エラー
///
/// 変更計画の実行に失敗した場合のエラーを表現します。
/// いずれの場合もトランザクションはロールバックされます。
#[derive(Debug, Clone, Error)]
pub enum ApplyError {
    /// バックアップ作成の失敗
    #[error("Failed to create backup at {path}: {cause}")]
    Backup {
        /// バックアップ出力先
        path: String,
        /// 根本原因
        cause: String,
    },

    /// DDL文の実行失敗
    #[error("{description}: {cause}\nSQL: {sql}")]
    Statement {
        /// 失敗した変更の説明
        description: String,
        /// 失敗したSQL文
        sql: String,
        /// SQLiteのエラーメッセージ
        cause: String,
    },

    /// 移行後の外部キー整合性違反
    #[error("Foreign key violations detected after migration ({violations} rows); rolled back")]
    ForeignKeyViolation {
        /// PRAGMA foreign_key_check が返した行数
        violations: usize,
    },

    /// トランザクション操作の失敗
    #[error("Transaction error: {message} (cause: {cause})")]
    Transaction {
        /// エラーメッセージ
        message: String,
        /// 根本原因
        cause: String,
    },

    /// データベースエラー
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ApplyError {
    /// 外部キー整合性違反かどうか
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, ApplyError::ForeignKeyViolation { .. })
    }
}

/// 入出力エラー
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// ファイル読み取りの失敗
    #[error("Failed to read file: {path} (cause: {cause})")]
    ReadFailed {
        /// 対象パス
        path: String,
        /// 根本原因
        cause: String,
    },

    /// ファイル書き込みの失敗
    #[error("Failed to write file: {path} (cause: {cause})")]
    WriteFailed {
        /// 対象パス
        path: String,
        /// 根本原因
        cause: String,
    },

    /// ディレクトリ作成の失敗
    #[error("Failed to create directory: {path} (cause: {cause})")]
    CreateDirFailed {
        /// 対象パス
        path: String,
        /// 根本原因
        cause: String,
    },
}

/// 設定エラー
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// 設定ファイルが見つからない
    #[error("Config file not found: {path}")]
    NotFound {
        /// 対象パス
        path: String,
    },

    /// 設定ファイルの解析失敗
    #[error("Failed to parse config file: {cause}")]
    Parse {
        /// 根本原因
        cause: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_display() {
        let error = DatabaseError::Connection {
            message: "Failed to open database: app.db".to_string(),
            cause: "unable to open database file".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("Database connection error"));
        assert!(text.contains("app.db"));
        assert!(text.contains("unable to open database file"));
    }

    #[test]
    fn test_schema_load_error_carries_file_name() {
        let error = SchemaLoadError::Execute {
            file: "users.sql".to_string(),
            cause: "near \"TABL\": syntax error".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("users.sql"));
        assert!(text.contains("syntax error"));
    }

    #[test]
    fn test_apply_statement_error_carries_sql() {
        let error = ApplyError::Statement {
            description: "Drop table \"users\"".to_string(),
            sql: "DROP TABLE \"users\";".to_string(),
            cause: "no such table: users".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("Drop table \"users\""));
        assert!(text.contains("DROP TABLE \"users\";"));
    }

    #[test]
    fn test_is_foreign_key_violation() {
        let violation = ApplyError::ForeignKeyViolation { violations: 3 };
        assert!(violation.is_foreign_key_violation());
        assert!(violation.to_string().contains("3 rows"));

        let other = ApplyError::Transaction {
            message: "Failed to begin transaction".to_string(),
            cause: "database is locked".to_string(),
        };
        assert!(!other.is_foreign_key_violation());
    }

    #[test]
    fn test_io_error_wraps_into_schema_load_error() {
        let io = IoError::ReadFailed {
            path: "schema/users.sql".to_string(),
            cause: "permission denied".to_string(),
        };
        let error: SchemaLoadError = io.into();
        assert!(error.to_string().contains("schema/users.sql"));
    }
}
