// CLIテスト共通ヘルパー
//
// テスト全体で共有されるユーティリティ関数を集約する。
// テストファイルから `mod common;` で利用可能。

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// テスト用プロジェクトディレクトリを作成
pub fn create_project() -> TempDir {
    TempDir::new().unwrap()
}

/// スキーマを流し込んだSQLiteデータベースファイルを作成
pub async fn create_database(project: &Path, name: &str, schema: &str) -> PathBuf {
    let path = project.join(name);
    let connections = shale::adapters::database::DatabaseConnectionService::new();
    let mut conn = connections.connect(&path).await.unwrap();
    if !schema.is_empty() {
        sqlx::raw_sql(schema).execute(&mut conn).await.unwrap();
    }
    path
}

/// スキーマディレクトリと.sqlファイルを作成
pub fn create_schema_dir(project: &Path, files: &[(&str, &str)]) -> PathBuf {
    let schema_dir = project.join("schema");
    fs::create_dir_all(&schema_dir).unwrap();
    for (name, content) in files {
        fs::write(schema_dir.join(name), content).unwrap();
    }
    schema_dir
}

/// テーブルのカラム名一覧を取得
pub async fn column_names(db_path: &Path, table: &str) -> Vec<String> {
    let connections = shale::adapters::database::DatabaseConnectionService::new();
    let mut conn = connections.connect(db_path).await.unwrap();
    sqlx::query("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
        .bind(table)
        .fetch_all(&mut conn)
        .await
        .unwrap()
        .iter()
        .map(|row| sqlx::Row::get(row, "name"))
        .collect()
}
