// スキーマ差分モデル
//
// 差分プランナーが生成する変更（Change）の型と、実行安全な
// 優先度順ソート、マイグレーションスクリプトの出力を提供します。

use serde::{Deserialize, Serialize};
use std::fmt;

/// スキーマ変更の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    CreateTable,
    DropTable,
    AddColumn,
    RecreateTable,
    CreateIndex,
    DropIndex,
    CreateView,
    DropView,
    CreateTrigger,
    DropTrigger,
}

impl ChangeType {
    /// 実行安全な優先度（小さいほど先に実行）
    ///
    /// トリガーはビューを、ビューはテーブル・インデックスを参照しうるため、
    /// DROPは依存の外側から行います。同名オブジェクトの入れ替え
    /// （旧を削除して新を作成）が単一トランザクション内で合法になるよう、
    /// すべてのDROPがすべてのCREATEに先行します。
    pub fn priority(&self) -> u8 {
        match self {
            ChangeType::DropTrigger => 1,
            ChangeType::DropView => 2,
            ChangeType::DropIndex => 3,
            ChangeType::DropTable => 4,
            ChangeType::RecreateTable => 5,
            ChangeType::CreateTable => 6,
            ChangeType::AddColumn => 7,
            ChangeType::CreateIndex => 8,
            ChangeType::CreateView => 9,
            ChangeType::CreateTrigger => 10,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeType::CreateTable => "CREATE_TABLE",
            ChangeType::DropTable => "DROP_TABLE",
            ChangeType::AddColumn => "ADD_COLUMN",
            ChangeType::RecreateTable => "RECREATE_TABLE",
            ChangeType::CreateIndex => "CREATE_INDEX",
            ChangeType::DropIndex => "DROP_INDEX",
            ChangeType::CreateView => "CREATE_VIEW",
            ChangeType::DropView => "DROP_VIEW",
            ChangeType::CreateTrigger => "CREATE_TRIGGER",
            ChangeType::DropTrigger => "DROP_TRIGGER",
        };
        f.write_str(s)
    }
}

/// 単一のスキーマ変更
///
/// 1つの変更は1つ以上のSQL文を実行順で保持します
/// （テーブル再作成は4段階のSQL列を1つの変更として持ちます）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// 変更の種別
    #[serde(rename = "type")]
    pub change_type: ChangeType,

    /// 対象オブジェクト名
    pub object: String,

    /// 人間可読な説明
    pub description: String,

    /// 適用するSQL文（実行順）
    pub sql: Vec<String>,

    /// ユーザーの行データを失う可能性がある変更か
    pub destructive: bool,
}

/// 変更リストを実行安全な順序へ並べ替える
///
/// 優先度が同じ変更はオブジェクト名の辞書順で並びます。
/// 安定ソートであるため、同一キーの変更同士の相対順は保たれます。
pub fn sort_changes(changes: &mut [Change]) {
    changes.sort_by(|a, b| {
        a.change_type
            .priority()
            .cmp(&b.change_type.priority())
            .then_with(|| a.object.cmp(&b.object))
    });
}

/// 破壊的変更が含まれるかを判定
pub fn has_destructive(changes: &[Change]) -> bool {
    changes.iter().any(|c| c.destructive)
}

/// 変更計画からマイグレーションスクリプト全体を生成
///
/// 外部キー無効化とトランザクションで全体を包み、
/// 各変更の前に `-- <種別>: <説明>` のコメントを挿入します。
/// 変更が空の場合は空文字列を返します。
pub fn generate_script(changes: &[Change]) -> String {
    if changes.is_empty() {
        return String::new();
    }

    let mut script = String::new();
    script.push_str("-- Generated by shale\n");
    script.push_str("PRAGMA foreign_keys = OFF;\n");
    script.push_str("BEGIN TRANSACTION;\n\n");

    for change in changes {
        script.push_str(&format!(
            "-- {}: {}\n",
            change.change_type, change.description
        ));
        for statement in &change.sql {
            script.push_str(statement);
            script.push('\n');
        }
        script.push('\n');
    }

    script.push_str("COMMIT;\n");
    script.push_str("PRAGMA foreign_keys = ON;\n");

    script
}

/// SQL文の終端にセミコロンを保証する
pub(crate) fn ensure_semicolon(sql: &str) -> String {
    let trimmed = sql.trim();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{};", trimmed)
    }
}
