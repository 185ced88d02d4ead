// テーブルレベルの差分検出
//
// テーブル単位の判定を行います: 変更なし / ADD COLUMNのみ / 全体再作成。
// SQLiteのALTER TABLE ADD COLUMNは末尾への追加しかできないため、
// カラムの削除・変更・途中への挿入はすべてテーブル再作成になります。

use crate::core::normalize::normalize_sql;
use crate::core::schema::{Column, Database, Table};
use crate::core::schema_diff::{ensure_semicolon, Change, ChangeType};
use std::collections::HashSet;

use super::SchemaDiffPlanner;

impl SchemaDiffPlanner {
    /// テーブル集合の差分を検出
    ///
    /// 削除されたテーブル名を `dropped_tables` に、再作成と判定された
    /// テーブル名を `recreated_tables` に記録します。
    pub(crate) fn diff_tables(
        &self,
        from: &Database,
        to: &Database,
        dropped_tables: &mut HashSet<String>,
        recreated_tables: &mut HashSet<String>,
    ) -> Vec<Change> {
        let mut changes = Vec::new();

        // 削除されたテーブル
        for name in from.tables.keys() {
            if !to.has_table(name) {
                dropped_tables.insert(name.clone());
                changes.push(Change {
                    change_type: ChangeType::DropTable,
                    object: name.clone(),
                    description: format!("Drop table \"{}\"", name),
                    sql: vec![format!("DROP TABLE \"{}\";", name)],
                    destructive: true,
                });
            }
        }

        // 追加されたテーブル
        for (name, table) in &to.tables {
            if !from.has_table(name) {
                changes.push(Change {
                    change_type: ChangeType::CreateTable,
                    object: name.clone(),
                    description: format!("Create table \"{}\"", name),
                    sql: vec![ensure_semicolon(&table.sql)],
                    destructive: false,
                });
            }
        }

        // 両方に存在するテーブル
        for (name, to_table) in &to.tables {
            let Some(from_table) = from.get_table(name) else {
                continue;
            };

            let table_changes = self.diff_table_columns(from_table, to_table);
            if table_changes
                .iter()
                .any(|c| c.change_type == ChangeType::RecreateTable)
            {
                recreated_tables.insert(name.clone());
            }
            changes.extend(table_changes);
        }

        changes
    }

    /// テーブル単位の判定（最初に該当した規則が勝つ）
    ///
    /// 1. fromにあってtoにないカラム → 再作成
    /// 2. 両方にあり比較器が変更ありと判定したカラム → 再作成
    /// 3. 末尾以外の位置に追加された新カラム → 再作成
    /// 4. 末尾追加の新カラムのみ → 新カラムごとにADD COLUMN
    /// 5. カラム差分なしでCREATE TABLE文が正規化後に異なる → 再作成
    ///    （PRAGMA table_info に現れないUNIQUE/CHECK/外部キーの変更）
    /// 6. それ以外 → 変更なし
    pub(crate) fn diff_table_columns(&self, from: &Table, to: &Table) -> Vec<Change> {
        // 1. 削除されたカラム
        for column in &from.columns {
            if !to.has_column(&column.name) {
                return vec![self.recreate_table_change(from, to)];
            }
        }

        // 2. 変更されたカラム
        for to_column in &to.columns {
            if let Some(from_column) = from.get_column(&to_column.name) {
                if self.column_changed(from_column, to_column) {
                    return vec![self.recreate_table_change(from, to)];
                }
            }
        }

        // 追加されたカラムを位置つきで収集
        let new_columns: Vec<(usize, &Column)> = to
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !from.has_column(&c.name))
            .collect();

        // 3. 末尾以外への追加は再作成になる。
        //    既存カラム列がtoの先頭部分と要素単位で一致しない場合も同様。
        if !new_columns.is_empty() {
            let appended_only = new_columns.iter().all(|(i, _)| *i >= from.columns.len())
                && from
                    .columns
                    .iter()
                    .zip(to.columns.iter())
                    .all(|(f, t)| f.name == t.name);
            if !appended_only {
                return vec![self.recreate_table_change(from, to)];
            }
        }

        // 5. カラム差分がない場合でも制約変更をCREATE TABLE文で検出する
        if new_columns.is_empty() && table_definition_changed(from, to) {
            return vec![self.recreate_table_change(from, to)];
        }

        // 4. ADD COLUMN を定義順に生成
        new_columns
            .into_iter()
            .map(|(_, column)| self.add_column_change(&from.name, column))
            .collect()
    }

    fn add_column_change(&self, table_name: &str, column: &Column) -> Change {
        let (sql, synthesized) = generate_add_column_sql(table_name, column);

        let description = match synthesized {
            Some(default) => format!(
                "Add column \"{}\" to table \"{}\" (NOT NULL dropped, DEFAULT {} synthesized)",
                column.name, table_name, default
            ),
            None => format!("Add column \"{}\" to table \"{}\"", column.name, table_name),
        };

        Change {
            change_type: ChangeType::AddColumn,
            object: table_name.to_string(),
            description,
            sql: vec![sql],
            destructive: false,
        }
    }
}

/// 正規化したCREATE TABLE文同士を比較
///
/// 引用スタイルの違いを無視するため、識別子の引用符を取り除いて比較します。
fn table_definition_changed(from: &Table, to: &Table) -> bool {
    normalize_sql(&from.sql, true) != normalize_sql(&to.sql, true)
}

/// ALTER TABLE ADD COLUMN 文を生成
///
/// SQLiteはデフォルトなしのNOT NULLカラムを追加できないため、
/// その場合は型ファミリーに応じたデフォルトを合成し、NOT NULLを
/// ALTER文から落とします。合成したデフォルトを第2要素で返します。
fn generate_add_column_sql(table_name: &str, column: &Column) -> (String, Option<&'static str>) {
    let mut sql = format!(
        "ALTER TABLE \"{}\" ADD COLUMN \"{}\"",
        table_name, column.name
    );

    if !column.column_type.is_empty() {
        sql.push(' ');
        sql.push_str(&column.column_type);
    }

    let mut synthesized = None;
    if column.not_null {
        match &column.default_value {
            Some(default) => {
                sql.push_str(&format!(" NOT NULL DEFAULT {}", default));
            }
            None => {
                let default = default_for_type(&column.column_type);
                sql.push_str(&format!(" DEFAULT {}", default));
                synthesized = Some(default);
            }
        }
    } else if let Some(default) = &column.default_value {
        sql.push_str(&format!(" DEFAULT {}", default));
    }

    sql.push(';');
    (sql, synthesized)
}

/// 型ファミリーに応じた合成デフォルト値
///
/// VARCHAR(20) のような型引数は無視して先頭の型名で判定します。
/// 未知の型はTEXT扱いで空文字列になります。
fn default_for_type(column_type: &str) -> &'static str {
    let upper = column_type.to_ascii_uppercase();
    let base = upper.split(['(', ' ']).next().unwrap_or("");

    match base {
        "INTEGER" | "INT" | "BIGINT" | "SMALLINT" | "TINYINT" => "0",
        "REAL" | "FLOAT" | "DOUBLE" => "0.0",
        "BLOB" => "X''",
        _ => "''",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk_column(name: &str) -> Column {
        let mut column = Column::new(name.to_string(), "INTEGER".to_string(), false);
        column.primary_key = 1;
        column
    }

    fn text_column(name: &str) -> Column {
        Column::new(name.to_string(), "TEXT".to_string(), false)
    }

    fn table(name: &str, sql: &str, columns: Vec<Column>) -> Table {
        let mut table = Table::new(name.to_string(), sql.to_string());
        table.columns = columns;
        table
    }

    #[test]
    fn test_appended_column_generates_add_column() {
        let planner = SchemaDiffPlanner::new();
        let from = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT)",
            vec![pk_column("id"), text_column("a")],
        );
        let to = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT, b TEXT)",
            vec![pk_column("id"), text_column("a"), text_column("b")],
        );

        let changes = planner.diff_table_columns(&from, &to);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::AddColumn);
        assert!(!changes[0].destructive);
        assert_eq!(
            changes[0].sql,
            vec![r#"ALTER TABLE "t" ADD COLUMN "b" TEXT;"#]
        );
    }

    #[test]
    fn test_multiple_appended_columns_in_order() {
        let planner = SchemaDiffPlanner::new();
        let from = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY)",
            vec![pk_column("id")],
        );
        let to = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT, b TEXT)",
            vec![pk_column("id"), text_column("a"), text_column("b")],
        );

        let changes = planner.diff_table_columns(&from, &to);

        assert_eq!(changes.len(), 2);
        assert!(changes[0].sql[0].contains(r#""a" TEXT"#));
        assert!(changes[1].sql[0].contains(r#""b" TEXT"#));
    }

    #[test]
    fn test_mid_position_insert_requires_recreate() {
        let planner = SchemaDiffPlanner::new();
        let from = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT, c TEXT)",
            vec![pk_column("id"), text_column("a"), text_column("c")],
        );
        let to = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT, b TEXT, c TEXT)",
            vec![
                pk_column("id"),
                text_column("a"),
                text_column("b"),
                text_column("c"),
            ],
        );

        let changes = planner.diff_table_columns(&from, &to);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::RecreateTable);
        assert!(changes[0].destructive);
        // 共通カラムのみが移行先の定義順でコピーされる
        assert!(changes[0]
            .sql
            .iter()
            .any(|s| s == r#"INSERT INTO "t__new" (id, a, c) SELECT id, a, c FROM "t";"#));
    }

    #[test]
    fn test_dropped_column_requires_recreate() {
        let planner = SchemaDiffPlanner::new();
        let from = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT)",
            vec![pk_column("id"), text_column("a")],
        );
        let to = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY)",
            vec![pk_column("id")],
        );

        let changes = planner.diff_table_columns(&from, &to);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::RecreateTable);
    }

    #[test]
    fn test_changed_column_requires_recreate() {
        let planner = SchemaDiffPlanner::new();
        let from = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT)",
            vec![pk_column("id"), text_column("a")],
        );
        let mut changed = text_column("a");
        changed.column_type = "VARCHAR(255)".to_string();
        let to = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a VARCHAR(255))",
            vec![pk_column("id"), changed],
        );

        let changes = planner.diff_table_columns(&from, &to);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::RecreateTable);
    }

    #[test]
    fn test_constraint_change_without_column_diff_requires_recreate() {
        // PRAGMA table_info には現れないUNIQUE制約の追加
        let planner = SchemaDiffPlanner::new();
        let columns = vec![pk_column("id"), {
            let mut c = text_column("email");
            c.not_null = true;
            c
        }];
        let from = table(
            "u",
            "CREATE TABLE u (id INTEGER PRIMARY KEY, email TEXT NOT NULL)",
            columns.clone(),
        );
        let to = table(
            "u",
            "CREATE TABLE u (id INTEGER PRIMARY KEY, email TEXT NOT NULL UNIQUE)",
            columns,
        );

        let changes = planner.diff_table_columns(&from, &to);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::RecreateTable);
        assert!(changes[0].destructive);
    }

    #[test]
    fn test_formatting_only_table_sql_is_no_change() {
        let planner = SchemaDiffPlanner::new();
        let columns = vec![pk_column("id")];
        let from = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY)",
            columns.clone(),
        );
        let to = table(
            "t",
            "CREATE TABLE \"t\" (\n  id INTEGER PRIMARY KEY\n)",
            columns,
        );

        assert!(planner.diff_table_columns(&from, &to).is_empty());
    }

    #[test]
    fn test_not_null_append_without_default_synthesizes_default() {
        // NOT NULLはALTERから落ち、型に応じたデフォルトが合成される
        let planner = SchemaDiffPlanner::new();
        let from = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY)",
            vec![pk_column("id")],
        );
        let mut status = text_column("status");
        status.not_null = true;
        let to = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, status TEXT NOT NULL)",
            vec![pk_column("id"), status],
        );

        let changes = planner.diff_table_columns(&from, &to);

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].sql,
            vec![r#"ALTER TABLE "t" ADD COLUMN "status" TEXT DEFAULT '';"#]
        );
        assert!(changes[0].description.contains("DEFAULT '' synthesized"));
    }

    #[test]
    fn test_not_null_append_with_declared_default_keeps_not_null() {
        let planner = SchemaDiffPlanner::new();
        let from = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY)",
            vec![pk_column("id")],
        );
        let mut count = Column::new("count".to_string(), "INTEGER".to_string(), true);
        count.default_value = Some("7".to_string());
        let to = table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, count INTEGER NOT NULL DEFAULT 7)",
            vec![pk_column("id"), count],
        );

        let changes = planner.diff_table_columns(&from, &to);

        assert_eq!(
            changes[0].sql,
            vec![r#"ALTER TABLE "t" ADD COLUMN "count" INTEGER NOT NULL DEFAULT 7;"#]
        );
    }

    #[test]
    fn test_default_for_type_families() {
        assert_eq!(default_for_type("INTEGER"), "0");
        assert_eq!(default_for_type("int"), "0");
        assert_eq!(default_for_type("BIGINT"), "0");
        assert_eq!(default_for_type("REAL"), "0.0");
        assert_eq!(default_for_type("DOUBLE PRECISION"), "0.0");
        assert_eq!(default_for_type("BLOB"), "X''");
        assert_eq!(default_for_type("TEXT"), "''");
        assert_eq!(default_for_type("VARCHAR(20)"), "''");
        assert_eq!(default_for_type("JSONB"), "''");
    }

    #[test]
    fn test_diff_tables_create_and_drop() {
        let planner = SchemaDiffPlanner::new();
        let mut from = Database::new();
        from.add_table(table(
            "old",
            "CREATE TABLE old (id INTEGER PRIMARY KEY)",
            vec![pk_column("id")],
        ));
        let mut to = Database::new();
        to.add_table(table(
            "fresh",
            "CREATE TABLE fresh (id INTEGER PRIMARY KEY)",
            vec![pk_column("id")],
        ));

        let mut dropped = HashSet::new();
        let mut recreated = HashSet::new();
        let changes = planner.diff_tables(&from, &to, &mut dropped, &mut recreated);

        assert_eq!(changes.len(), 2);
        assert!(dropped.contains("old"));
        let drop = changes
            .iter()
            .find(|c| c.change_type == ChangeType::DropTable)
            .unwrap();
        assert_eq!(drop.sql, vec![r#"DROP TABLE "old";"#]);
        assert!(drop.destructive);

        let create = changes
            .iter()
            .find(|c| c.change_type == ChangeType::CreateTable)
            .unwrap();
        assert_eq!(create.sql, vec!["CREATE TABLE fresh (id INTEGER PRIMARY KEY);"]);
        assert!(!create.destructive);
        assert!(recreated.is_empty());
    }

    #[test]
    fn test_diff_tables_records_recreated_set() {
        let planner = SchemaDiffPlanner::new();
        let mut from = Database::new();
        from.add_table(table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT)",
            vec![pk_column("id"), text_column("a")],
        ));
        let mut to = Database::new();
        to.add_table(table(
            "t",
            "CREATE TABLE t (id INTEGER PRIMARY KEY)",
            vec![pk_column("id")],
        ));

        let mut dropped = HashSet::new();
        let mut recreated = HashSet::new();
        planner.diff_tables(&from, &to, &mut dropped, &mut recreated);

        assert!(recreated.contains("t"));
        assert!(dropped.is_empty());
    }
}
