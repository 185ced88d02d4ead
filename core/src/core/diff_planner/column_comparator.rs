// カラムレベルの比較
//
// PRAGMA table_info が公開する5項目に基づいてカラムの意味的等価を判定します。
// ここに現れない制約（UNIQUE/CHECK/FOREIGN KEY/生成カラム式）は
// CREATE TABLE文の正規化比較で検出されます。

use crate::core::schema::Column;

use super::SchemaDiffPlanner;

impl SchemaDiffPlanner {
    /// 2つのカラム定義が意味的に異なるかを判定
    ///
    /// 以下のいずれかに該当すれば「変更あり」:
    /// - 宣言された型が異なる（大文字小文字を区別しない）
    /// - NOT NULL制約の有無が異なる
    /// - 主キーかどうかが異なる（複合主キー内の序数の振り直しは変更とみなさない）
    /// - デフォルト式がトリム＋小文字化の後で異なる
    ///   （両方なしは等しい。片方のみありは変更）
    pub(crate) fn column_changed(&self, from: &Column, to: &Column) -> bool {
        if !from.column_type.eq_ignore_ascii_case(&to.column_type) {
            return true;
        }

        if from.not_null != to.not_null {
            return true;
        }

        if from.is_primary_key() != to.is_primary_key() {
            return true;
        }

        let from_default = from
            .default_value
            .as_deref()
            .map(normalize_default)
            .unwrap_or_default();
        let to_default = to
            .default_value
            .as_deref()
            .map(normalize_default)
            .unwrap_or_default();

        from_default != to_default
    }
}

/// デフォルト式を比較用に正規化
fn normalize_default(s: &str) -> String {
    s.trim().to_lowercase()
}
