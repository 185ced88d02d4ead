// スキーマ差分プランナー
//
// 2つのスキーマスナップショットを比較し、fromからtoへ移行するための
// DDL変更の順序付きリストを生成します。純粋な同期変換であり、
// I/Oも共有状態も持たず、入力スナップショットを変更しません。
// 整形されたスナップショットに対して失敗することはありません。

mod column_comparator;
mod dependent_differ;
mod table_differ;
mod table_recreator;

use crate::core::schema::Database;
use crate::core::schema_diff::{sort_changes, Change};
use std::collections::HashSet;

/// スキーマ差分プランナー
#[derive(Debug, Clone, Default)]
pub struct SchemaDiffPlanner;

impl SchemaDiffPlanner {
    /// 新しいSchemaDiffPlannerを作成
    pub fn new() -> Self {
        Self
    }

    /// 2つのスナップショットを比較して変更計画を生成
    ///
    /// テーブル差分が先に走り、削除・再作成されるテーブルの集合を記録します。
    /// 従属オブジェクト（インデックス・トリガー）の差分はその集合を参照し、
    /// 旧テーブルと共に暗黙的に削除されるオブジェクトのDROPを抑制します。
    /// 再作成されたテーブル上でtoに残るオブジェクトはCREATEが再発行されます。
    /// 最後に全変更を実行安全な優先度順へ並べ替えます。
    pub fn plan(&self, from: &Database, to: &Database) -> Vec<Change> {
        let mut dropped_tables: HashSet<String> = HashSet::new();
        let mut recreated_tables: HashSet<String> = HashSet::new();

        let mut changes = self.diff_tables(from, to, &mut dropped_tables, &mut recreated_tables);
        changes.extend(self.diff_indexes(from, to, &dropped_tables, &recreated_tables));
        changes.extend(self.diff_views(from, to));
        changes.extend(self.diff_triggers(from, to, &dropped_tables, &recreated_tables));

        sort_changes(&mut changes);
        changes
    }
}
