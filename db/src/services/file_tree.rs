// スキーマファイルツリー抽象
//
// ディスク上のディレクトリと埋め込みアーカイブの両方を同一の
// コードパスで扱うためのファイルツリー抽象を提供します。
// ローダーへコンポーネント単位で渡される設定オブジェクトであり、
// モジュールレベルのグローバル状態は持ちません。

use crate::core::error::IoError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// スキーマファイルの読み取り抽象
pub trait SchemaFileTree: Send + Sync {
    /// dir以下の .sql ファイルを全パスの辞書順で列挙する
    ///
    /// 拡張子の比較は大文字小文字を区別しません。
    fn list_sql_files(&self, dir: &Path) -> Result<Vec<PathBuf>, IoError>;

    /// ファイル内容をUTF-8文字列として読み取る
    fn read_to_string(&self, path: &Path) -> Result<String, IoError>;
}

/// OSファイルシステム実装
#[derive(Debug, Clone, Default)]
pub struct OsFileTree;

impl OsFileTree {
    /// 新しいOsFileTreeを作成
    pub fn new() -> Self {
        Self
    }
}

impl SchemaFileTree for OsFileTree {
    fn list_sql_files(&self, dir: &Path) -> Result<Vec<PathBuf>, IoError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| IoError::ReadFailed {
                path: dir.display().to_string(),
                cause: e.to_string(),
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            if has_sql_extension(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, IoError> {
        std::fs::read_to_string(path).map_err(|e| IoError::ReadFailed {
            path: path.display().to_string(),
            cause: e.to_string(),
        })
    }
}

/// インメモリ実装
///
/// 埋め込みスキーマやテストで使用します。
/// BTreeMapのキー順がそのまま辞書順の列挙になります。
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileTree {
    files: BTreeMap<PathBuf, String>,
}

impl InMemoryFileTree {
    /// 新しい空のInMemoryFileTreeを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルを追加
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl SchemaFileTree for InMemoryFileTree {
    fn list_sql_files(&self, dir: &Path) -> Result<Vec<PathBuf>, IoError> {
        Ok(self
            .files
            .keys()
            .filter(|p| p.starts_with(dir) && has_sql_extension(p))
            .cloned()
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, IoError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::ReadFailed {
                path: path.display().to_string(),
                cause: "file not found".to_string(),
            })
    }
}

/// 拡張子が .sql か（大文字小文字を区別しない）
fn has_sql_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("sql"))
}
