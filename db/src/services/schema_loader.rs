// スキーマファイル読み込みサービス
//
// .sqlファイルをインメモリSQLiteに対して実行し、その結果を
// 移行先スナップショットとして抽出します。SQLを自前で
// 解析するのではなく、SQLite自身に解釈させることで
// 方言差や細部の解釈ずれを避けます。

use crate::adapters::database::DatabaseConnectionService;
use crate::core::error::SchemaLoadError;
use crate::core::schema::Database;
use crate::services::file_tree::{OsFileTree, SchemaFileTree};
use crate::services::schema_extractor::SchemaExtractorService;
use std::path::Path;
use tracing::debug;

/// スキーマファイル読み込みサービス
pub struct SchemaLoaderService {
    file_tree: Box<dyn SchemaFileTree>,
}

impl SchemaLoaderService {
    /// OSファイルシステムを読むローダーを作成
    pub fn new() -> Self {
        Self {
            file_tree: Box::new(OsFileTree::new()),
        }
    }

    /// 任意のファイルツリーを読むローダーを作成
    ///
    /// 埋め込みアーカイブなど、ディスク以外のソースを扱う場合に使います。
    pub fn with_file_tree(file_tree: Box<dyn SchemaFileTree>) -> Self {
        Self { file_tree }
    }

    /// SQL文字列からスナップショットを構築
    pub async fn from_sql(&self, sql: &str) -> Result<Database, SchemaLoadError> {
        let connections = DatabaseConnectionService::new();
        let mut conn = connections.connect_in_memory().await?;

        sqlx::raw_sql(sql)
            .execute(&mut conn)
            .await
            .map_err(|e| SchemaLoadError::Execute {
                file: "<inline>".to_string(),
                cause: e.to_string(),
            })?;

        let extractor = SchemaExtractorService::new();
        Ok(extractor.extract(&mut conn).await?)
    }

    /// ディレクトリ以下の.sqlファイルからスナップショットを構築
    ///
    /// ファイルは全パスの辞書順で1つずつ実行され、失敗時は
    /// どのファイルで失敗したかを含むエラーを返します。
    pub async fn from_dir(&self, dir: &Path) -> Result<Database, SchemaLoadError> {
        let files = self.file_tree.list_sql_files(dir)?;

        let connections = DatabaseConnectionService::new();
        let mut conn = connections.connect_in_memory().await?;

        for path in files {
            debug!(file = %path.display(), "Executing schema file");
            let content = self.file_tree.read_to_string(&path)?;

            sqlx::raw_sql(&content)
                .execute(&mut conn)
                .await
                .map_err(|e| SchemaLoadError::Execute {
                    file: file_label(&path),
                    cause: e.to_string(),
                })?;
        }

        let extractor = SchemaExtractorService::new();
        Ok(extractor.extract(&mut conn).await?)
    }
}

impl Default for SchemaLoaderService {
    fn default() -> Self {
        Self::new()
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
