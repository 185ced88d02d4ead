// スキーマドメインモデル
//
// SQLiteデータベースのスキーマスナップショットを表現する型システム。
// Database, Table, Column, Index, View, Trigger の構造体を提供します。
// スナップショットは抽出時に構築され、以降は不変として扱われます。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// データベーススキーマのスナップショット
///
/// ある時点のデータベース全体のスキーマを表現します。
/// オブジェクト名をキーとした4種類のマップを保持します。
/// 名前は種別ごとにグローバルに一意です（SQLiteの格納形のまま、
/// 大文字小文字を区別します）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    /// テーブル定義のマップ（テーブル名 -> Table）
    pub tables: BTreeMap<String, Table>,

    /// インデックス定義のマップ（インデックス名 -> Index）
    pub indexes: BTreeMap<String, Index>,

    /// ビュー定義のマップ（ビュー名 -> View）
    pub views: BTreeMap<String, View>,

    /// トリガー定義のマップ（トリガー名 -> Trigger）
    pub triggers: BTreeMap<String, Trigger>,
}

impl Database {
    /// 新しい空のスナップショットを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// テーブルを追加
    pub fn add_table(&mut self, table: Table) {
        let name = table.name.clone();
        self.tables.insert(name, table);
    }

    /// インデックスを追加
    pub fn add_index(&mut self, index: Index) {
        let name = index.name.clone();
        self.indexes.insert(name, index);
    }

    /// ビューを追加
    pub fn add_view(&mut self, view: View) {
        let name = view.name.clone();
        self.views.insert(name, view);
    }

    /// トリガーを追加
    pub fn add_trigger(&mut self, trigger: Trigger) {
        let name = trigger.name.clone();
        self.triggers.insert(name, trigger);
    }

    /// 指定されたテーブルが存在するか確認
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// 指定されたテーブルを取得
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// スナップショットが空か（オブジェクトを1つも含まないか）
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.indexes.is_empty()
            && self.views.is_empty()
            && self.triggers.is_empty()
    }
}

/// テーブル定義
///
/// カラム列の順序は定義順そのままで保持します。
/// 新しいカラムが末尾追加か途中挿入かの判定に使われるため、
/// この順序は正規の情報です。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// テーブル名
    pub name: String,

    /// カラム定義のリスト（定義順）
    pub columns: Vec<Column>,

    /// 元のCREATE TABLE文
    pub sql: String,
}

impl Table {
    /// 新しいテーブルを作成
    pub fn new(name: String, sql: String) -> Self {
        Self {
            name,
            columns: Vec::new(),
            sql,
        }
    }

    /// カラムを追加
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// 指定された名前のカラムが存在するか確認
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// 指定された名前のカラムを取得
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// カラム名のリストを定義順で取得
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// カラム定義
///
/// PRAGMA table_info が公開する5項目を保持します。
/// ここに現れない制約（UNIQUE/CHECK/FOREIGN KEY）は
/// CREATE TABLE文の比較で扱われます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// カラム名
    pub name: String,

    /// 宣言された型（自由形式の文字列）
    pub column_type: String,

    /// NOT NULL制約の有無
    pub not_null: bool,

    /// デフォルト式（宣言されていない場合はNone）
    pub default_value: Option<String>,

    /// 主キー内の序数（0 = 主キーでない、1以上 = 複合主キー内の位置）
    pub primary_key: i64,
}

impl Column {
    /// 新しいカラムを作成
    pub fn new(name: String, column_type: String, not_null: bool) -> Self {
        Self {
            name,
            column_type,
            not_null,
            default_value: None,
            primary_key: 0,
        }
    }

    /// 主キーの一部かどうか
    pub fn is_primary_key(&self) -> bool {
        self.primary_key > 0
    }
}

/// インデックス定義
///
/// SQLiteがUNIQUE/PRIMARY KEYのために自動生成するインデックスは
/// スナップショットに含まれません。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// インデックス名
    pub name: String,

    /// 所属テーブル名
    pub table: String,

    /// 元のCREATE INDEX文
    pub sql: String,
}

impl Index {
    /// 新しいインデックスを作成
    pub fn new(name: String, table: String, sql: String) -> Self {
        Self { name, table, sql }
    }
}

/// ビュー定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// ビュー名
    pub name: String,

    /// 元のCREATE VIEW文
    pub sql: String,
}

impl View {
    /// 新しいビューを作成
    pub fn new(name: String, sql: String) -> Self {
        Self { name, sql }
    }
}

/// トリガー定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// トリガー名
    pub name: String,

    /// 所属テーブル名
    pub table: String,

    /// 元のCREATE TRIGGER文（ENDまで）
    pub sql: String,
}

impl Trigger {
    /// 新しいトリガーを作成
    pub fn new(name: String, table: String, sql: String) -> Self {
        Self { name, table, sql }
    }
}
