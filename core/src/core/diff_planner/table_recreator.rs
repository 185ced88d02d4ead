// テーブル再作成SQL生成
//
// SQLiteがインプレースで変更できないテーブルに対して、
// 影テーブル作成 → 共通カラムコピー → 旧テーブル削除 → リネーム
// の4段階のSQL列を生成します。4文は1つの変更として保持され、
// 外側のトランザクション内で不可分に実行されます。

use crate::core::schema::Table;
use crate::core::schema_diff::{ensure_semicolon, Change, ChangeType};
use regex::Regex;
use std::sync::LazyLock;

use super::SchemaDiffPlanner;

/// CREATE TABLE文中のテーブル名を検出する正規表現
///
/// 大文字小文字を区別せず、IF NOT EXISTS と識別子の引用
/// （" ' ` [ ]）に対応します。置換するのは識別子のみです。
static TABLE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?)["'`\[]?(\w+)["'`\]]?"#)
        .expect("Invalid table name regex")
});

impl SchemaDiffPlanner {
    /// テーブル再作成のChangeを構築
    pub(crate) fn recreate_table_change(&self, from: &Table, to: &Table) -> Change {
        Change {
            change_type: ChangeType::RecreateTable,
            object: from.name.clone(),
            description: format!("Recreate table \"{}\" (schema changed)", from.name),
            sql: generate_recreate_sql(&from.name, from, to),
            destructive: true,
        }
    }
}

/// 再作成の4段階SQL列を生成
///
/// 共通カラムが1つもない場合はデータコピー文を省略します。
fn generate_recreate_sql(name: &str, from: &Table, to: &Table) -> Vec<String> {
    let temp_name = format!("{}__new", name);

    let create_sql = replace_table_name(&to.sql, &temp_name);
    let mut statements = vec![ensure_semicolon(&create_sql)];

    let common = common_columns(from, to);
    if !common.is_empty() {
        let columns = common.join(", ");
        statements.push(format!(
            "INSERT INTO \"{}\" ({}) SELECT {} FROM \"{}\";",
            temp_name, columns, columns, name
        ));
    }

    statements.push(format!("DROP TABLE \"{}\";", name));
    statements.push(format!(
        "ALTER TABLE \"{}\" RENAME TO \"{}\";",
        temp_name, name
    ));

    statements
}

/// 両テーブルに共通するカラム名を、移行先の定義順で返す
fn common_columns(from: &Table, to: &Table) -> Vec<String> {
    to.columns
        .iter()
        .filter(|c| from.has_column(&c.name))
        .map(|c| c.name.clone())
        .collect()
}

/// CREATE TABLE文中のテーブル名のみを新しい名前へ書き換える
fn replace_table_name(sql: &str, new_name: &str) -> String {
    TABLE_NAME_REGEX
        .replace(sql, format!("${{1}}\"{}\"", new_name))
        .to_string()
}
