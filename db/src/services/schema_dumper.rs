// スキーマダンプサービス
//
// スナップショットを宣言的な .sql ファイル群として書き出します。
// 種別ごとに1ファイル、オブジェクト名順、セミコロン終端、空行区切り。
// 出力はそのままスキーマディレクトリとして再読込できる形式です。

use crate::core::error::IoError;
use crate::core::schema::Database;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// ダンプ結果の概要
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DumpSummary {
    pub tables: usize,
    pub indexes: usize,
    pub views: usize,
    pub triggers: usize,
}

/// スキーマダンプサービス
#[derive(Debug, Clone, Default)]
pub struct SchemaDumperService;

impl SchemaDumperService {
    /// 新しいSchemaDumperServiceを作成
    pub fn new() -> Self {
        Self
    }

    /// スナップショットを出力ディレクトリへ書き出す
    ///
    /// 空の種別のファイルは作成しません。
    pub fn dump(&self, database: &Database, output_dir: &Path) -> Result<DumpSummary, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::CreateDirFailed {
            path: output_dir.display().to_string(),
            cause: e.to_string(),
        })?;

        if !database.tables.is_empty() {
            let statements = database.tables.values().map(|t| t.sql.as_str());
            write_sql_file(&output_dir.join("tables.sql"), statements)?;
        }

        if !database.indexes.is_empty() {
            let statements = database.indexes.values().map(|i| i.sql.as_str());
            write_sql_file(&output_dir.join("indexes.sql"), statements)?;
        }

        if !database.views.is_empty() {
            let statements = database.views.values().map(|v| v.sql.as_str());
            write_sql_file(&output_dir.join("views.sql"), statements)?;
        }

        if !database.triggers.is_empty() {
            let statements = database.triggers.values().map(|t| t.sql.as_str());
            write_sql_file(&output_dir.join("triggers.sql"), statements)?;
        }

        Ok(DumpSummary {
            tables: database.tables.len(),
            indexes: database.indexes.len(),
            views: database.views.len(),
            triggers: database.triggers.len(),
        })
    }
}

fn write_sql_file<'a>(
    path: &Path,
    statements: impl Iterator<Item = &'a str>,
) -> Result<(), IoError> {
    let mut content = String::new();
    for sql in statements {
        let _ = writeln!(content, "{};\n", sql.trim_end().trim_end_matches(';'));
    }

    fs::write(path, content).map_err(|e| IoError::WriteFailed {
        path: path.display().to_string(),
        cause: e.to_string(),
    })
}
