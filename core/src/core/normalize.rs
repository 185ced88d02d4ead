// SQL正規化
//
// DDL文字列を意味比較可能な正準形へ変換します。
// 書式（空白・改行・識別子の引用スタイル）のみが異なる2つのDDLが
// 等しく比較できるようにします。シングルクォート文字列リテラルの
// 内容は変換から保護され、バイト単位で保持されます。

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// SQLite文字列リテラル検出用の正規表現
///
/// `''` によるクォートのエスケープ（例: 'O''Neil'）に対応します。
/// ペア単位で釣り合う最長の形をマッチし、重なり合うマッチは生じません。
static STRING_LITERAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(?:[^']|'')*'").expect("Invalid string literal regex"));

/// DDL文字列を正準形へ正規化
///
/// `strip_quotes` が true の場合は識別子の引用符（" ` [ ]）も取り除きます。
/// CREATE TABLE文の比較では引用の有無を無視するため true を、
/// インデックス・ビュー・トリガーの比較では false を使います。
pub fn normalize_sql(sql: &str, strip_quotes: bool) -> String {
    // 文字列リテラルをプレースホルダーへ退避して変換から保護する。
    // プレースホルダーは小文字化しても変化しない形を選ぶ。
    let mut literals: Vec<String> = Vec::new();
    let masked = STRING_LITERAL_REGEX.replace_all(sql, |caps: &Captures| {
        literals.push(caps[0].to_string());
        format!(" __str_protect_{}__ ", literals.len() - 1)
    });

    let mut normalized = perform_normalization(&masked, strip_quotes);

    // 逆順の置換でリテラルを復元する
    for (i, literal) in literals.iter().enumerate() {
        let placeholder = format!("__str_protect_{}__", i);
        normalized = normalized.replacen(placeholder.as_str(), literal, 1);
    }

    normalized
}

fn perform_normalization(sql: &str, strip_quotes: bool) -> String {
    let trimmed = sql.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed);

    let mut sql = trimmed.to_string();

    if strip_quotes {
        // SQLiteは引用あり・なしの両方の識別子を受け付ける
        sql = sql.replace(['"', '`', '[', ']'], "");
    }

    // 空白の連続を単一スペースへ潰し、全体を小文字化する
    sql = sql
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    // 句読点前後のスペースを除去する
    for ch in ['(', ')', ',', '='] {
        sql = sql.replace(&format!(" {ch}"), &ch.to_string());
        sql = sql.replace(&format!("{ch} "), &ch.to_string());
    }

    // カンマの後にはスペースを1つ入れる
    sql = sql.replace(',', ", ");

    // 生じた二重スペースを解消する
    while sql.contains("  ") {
        sql = sql.replace("  ", " ");
    }

    sql.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sql() {
        let tests: Vec<(&str, &str, bool, &str)> = vec![
            (
                "basic normalization",
                "CREATE   TABLE  foo  ( a INT )",
                true,
                "create table foo(a int)",
            ),
            (
                "string literal preservation",
                "SELECT 'Hello,   World'",
                false,
                "select 'Hello,   World'",
            ),
            (
                "escaped quotes in string",
                "SELECT 'O''Neil'",
                false,
                "select 'O''Neil'",
            ),
            (
                "mixed content",
                "CREATE VIEW v AS SELECT 'foo,  bar' AS x, column2 FROM t",
                false,
                "create view v as select 'foo,  bar' as x, column2 from t",
            ),
            (
                "strip quotes from identifiers",
                r#"CREATE TABLE "MyTable" ([id] INT)"#,
                true,
                "create table mytable(id int)",
            ),
            (
                "keep quotes when strip_quotes is false",
                r#"CREATE TABLE "MyTable""#,
                false,
                r#"create table "mytable""#,
            ),
            (
                "trailing semicolon and newlines",
                "CREATE INDEX idx ON t(a);\n\n",
                false,
                "create index idx on t(a)",
            ),
            (
                "multi-line column list",
                "CREATE INDEX idx ON t(\n  a,\n  b\n)",
                false,
                "create index idx on t(a, b)",
            ),
        ];

        for (name, input, strip_quotes, want) in tests {
            let got = normalize_sql(input, strip_quotes);
            assert_eq!(got, want, "case: {}", name);
        }
    }

    #[test]
    fn test_formatting_only_difference_is_equal() {
        assert_eq!(
            normalize_sql("CREATE INDEX idx ON t(a)", false),
            normalize_sql("CREATE INDEX idx ON t (a)\n", false),
        );
        assert_ne!(
            normalize_sql("CREATE INDEX idx ON t(a)", false),
            normalize_sql("CREATE INDEX idx ON t(b)", false),
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "CREATE   TABLE  foo  ( a INT )",
            "SELECT 'Hello,   World'",
            "SELECT 'O''Neil'",
            r#"CREATE TABLE "MyTable" ([id] INT)"#,
            "CREATE TRIGGER trg AFTER INSERT ON t BEGIN UPDATE t SET x = 'a,  b'; END",
            "",
            "   ;   ",
        ];

        for input in inputs {
            for strip_quotes in [true, false] {
                let once = normalize_sql(input, strip_quotes);
                let twice = normalize_sql(&once, strip_quotes);
                assert_eq!(once, twice, "input: {:?}", input);
            }
        }
    }

    #[test]
    fn test_literal_bytes_survive_punctuation_rules() {
        // リテラル内のカンマ・括弧・連続空白は正規化の対象外
        let sql = "CREATE TABLE t (a TEXT DEFAULT 'x, (y)  = z')";
        let normalized = normalize_sql(sql, true);
        assert!(normalized.contains("'x, (y)  = z'"), "got: {}", normalized);
    }

    #[test]
    fn test_many_literals_restore_in_order() {
        // 10個を超えるリテラルでもプレースホルダーの復元が混線しないこと
        let mut sql = String::from("SELECT ");
        let literals: Vec<String> = (0..12).map(|i| format!("'Lit{}'", i)).collect();
        sql.push_str(&literals.join(", "));

        let normalized = normalize_sql(&sql, false);
        for literal in &literals {
            assert!(normalized.contains(literal.as_str()), "missing {}", literal);
        }
    }

    #[test]
    fn test_default_expression_spacing() {
        assert_eq!(
            normalize_sql("CREATE TABLE t (a INT DEFAULT ( 1 + 2 ))", true),
            "create table t(a int default(1 + 2))",
        );
    }
}
