// 従属オブジェクトの差分検出
//
// インデックス・ビュー・トリガーの追加/削除/変更を検出します。
// 所属テーブルが削除または再作成される場合、SQLiteは旧テーブルと
// 共に従属オブジェクトを暗黙的に削除するため、DROPは発行しません。
// 再作成されたテーブル上でtoに存在するオブジェクトは、テキスト差分の
// 有無によらずCREATEを再発行します。ビューは特定のテーブルに
// 所属しないためカスケード規則はありません。

use crate::core::normalize::normalize_sql;
use crate::core::schema::Database;
use crate::core::schema_diff::{ensure_semicolon, Change, ChangeType};
use std::collections::HashSet;

use super::SchemaDiffPlanner;

impl SchemaDiffPlanner {
    /// インデックス集合の差分を検出
    pub(crate) fn diff_indexes(
        &self,
        from: &Database,
        to: &Database,
        dropped_tables: &HashSet<String>,
        recreated_tables: &HashSet<String>,
    ) -> Vec<Change> {
        let mut changes = Vec::new();

        // 削除されたインデックス
        // （削除・再作成テーブル上のものは暗黙削除に任せる）
        for (name, index) in &from.indexes {
            if dropped_tables.contains(&index.table) || recreated_tables.contains(&index.table) {
                continue;
            }
            if !to.indexes.contains_key(name) {
                changes.push(drop_change(
                    ChangeType::DropIndex,
                    name,
                    &format!("Drop index \"{}\"", name),
                    &format!("DROP INDEX IF EXISTS \"{}\";", name),
                ));
            }
        }

        // 追加・変更されたインデックス
        for (name, to_index) in &to.indexes {
            // 再作成テーブル上のインデックスは旧テーブルと共に消えているため、
            // 既存かどうかによらず再発行する
            if recreated_tables.contains(&to_index.table) {
                changes.push(create_change(
                    ChangeType::CreateIndex,
                    name,
                    &format!("Create index \"{}\"", name),
                    &to_index.sql,
                ));
                continue;
            }

            match from.indexes.get(name) {
                None => {
                    changes.push(create_change(
                        ChangeType::CreateIndex,
                        name,
                        &format!("Create index \"{}\"", name),
                        &to_index.sql,
                    ));
                }
                Some(from_index)
                    if normalize_sql(&from_index.sql, false)
                        != normalize_sql(&to_index.sql, false) =>
                {
                    // 変更されたインデックスは削除して作り直す
                    changes.push(drop_change(
                        ChangeType::DropIndex,
                        name,
                        &format!("Drop index \"{}\" (will recreate)", name),
                        &format!("DROP INDEX IF EXISTS \"{}\";", name),
                    ));
                    changes.push(create_change(
                        ChangeType::CreateIndex,
                        name,
                        &format!("Create index \"{}\"", name),
                        &to_index.sql,
                    ));
                }
                Some(_) => {}
            }
        }

        changes
    }

    /// ビュー集合の差分を検出
    pub(crate) fn diff_views(&self, from: &Database, to: &Database) -> Vec<Change> {
        let mut changes = Vec::new();

        for name in from.views.keys() {
            if !to.views.contains_key(name) {
                changes.push(drop_change(
                    ChangeType::DropView,
                    name,
                    &format!("Drop view \"{}\"", name),
                    &format!("DROP VIEW IF EXISTS \"{}\";", name),
                ));
            }
        }

        for (name, to_view) in &to.views {
            match from.views.get(name) {
                None => {
                    changes.push(create_change(
                        ChangeType::CreateView,
                        name,
                        &format!("Create view \"{}\"", name),
                        &to_view.sql,
                    ));
                }
                Some(from_view)
                    if normalize_sql(&from_view.sql, false)
                        != normalize_sql(&to_view.sql, false) =>
                {
                    changes.push(drop_change(
                        ChangeType::DropView,
                        name,
                        &format!("Drop view \"{}\" (will recreate)", name),
                        &format!("DROP VIEW IF EXISTS \"{}\";", name),
                    ));
                    changes.push(create_change(
                        ChangeType::CreateView,
                        name,
                        &format!("Create view \"{}\"", name),
                        &to_view.sql,
                    ));
                }
                Some(_) => {}
            }
        }

        changes
    }

    /// トリガー集合の差分を検出
    pub(crate) fn diff_triggers(
        &self,
        from: &Database,
        to: &Database,
        dropped_tables: &HashSet<String>,
        recreated_tables: &HashSet<String>,
    ) -> Vec<Change> {
        let mut changes = Vec::new();

        for (name, trigger) in &from.triggers {
            if dropped_tables.contains(&trigger.table) || recreated_tables.contains(&trigger.table)
            {
                continue;
            }
            if !to.triggers.contains_key(name) {
                changes.push(drop_change(
                    ChangeType::DropTrigger,
                    name,
                    &format!("Drop trigger \"{}\"", name),
                    &format!("DROP TRIGGER IF EXISTS \"{}\";", name),
                ));
            }
        }

        for (name, to_trigger) in &to.triggers {
            if recreated_tables.contains(&to_trigger.table) {
                changes.push(create_change(
                    ChangeType::CreateTrigger,
                    name,
                    &format!("Create trigger \"{}\"", name),
                    &to_trigger.sql,
                ));
                continue;
            }

            match from.triggers.get(name) {
                None => {
                    changes.push(create_change(
                        ChangeType::CreateTrigger,
                        name,
                        &format!("Create trigger \"{}\"", name),
                        &to_trigger.sql,
                    ));
                }
                Some(from_trigger)
                    if normalize_sql(&from_trigger.sql, false)
                        != normalize_sql(&to_trigger.sql, false) =>
                {
                    changes.push(drop_change(
                        ChangeType::DropTrigger,
                        name,
                        &format!("Drop trigger \"{}\" (will recreate)", name),
                        &format!("DROP TRIGGER IF EXISTS \"{}\";", name),
                    ));
                    changes.push(create_change(
                        ChangeType::CreateTrigger,
                        name,
                        &format!("Create trigger \"{}\"", name),
                        &to_trigger.sql,
                    ));
                }
                Some(_) => {}
            }
        }

        changes
    }
}

/// DROP系のChangeを構築（スキーマから復元可能なため非破壊的）
fn drop_change(change_type: ChangeType, object: &str, description: &str, sql: &str) -> Change {
    Change {
        change_type,
        object: object.to_string(),
        description: description.to_string(),
        sql: vec![sql.to_string()],
        destructive: false,
    }
}

/// CREATE系のChangeを構築
fn create_change(change_type: ChangeType, object: &str, description: &str, sql: &str) -> Change {
    Change {
        change_type,
        object: object.to_string(),
        description: description.to_string(),
        sql: vec![ensure_semicolon(sql)],
        destructive: false,
    }
}
