// 変更リスト整形
//
// 変更計画を人間可読なテキストへ整形します。
// 破壊的変更は赤、それ以外は緑で表示します。

use crate::core::schema_diff::Change;
use colored::Colorize;

/// 変更リストの整形サービス
#[derive(Debug, Default)]
pub struct ChangeFormatter;

impl ChangeFormatter {
    /// 新しいChangeFormatterを作成
    pub fn new() -> Self {
        Self
    }

    /// 変更一覧を整形
    ///
    /// 各行は `[+]`（追加系）または `[-]`（破壊的）で始まり、
    /// 末尾に件数の合計を付けます。
    pub fn format_changes(&self, changes: &[Change]) -> String {
        let mut output = String::new();

        for change in changes {
            let symbol = if change.destructive { "-" } else { "+" };
            let line = format!(
                "[{}] {}: {}",
                symbol, change.change_type, change.description
            );
            if change.destructive {
                output.push_str(&line.red().to_string());
            } else {
                output.push_str(&line.green().to_string());
            }
            output.push('\n');
        }

        let destructive = changes.iter().filter(|c| c.destructive).count();
        output.push_str(&format!(
            "\nTotal changes: {} ({} destructive)\n",
            changes.len(),
            destructive
        ));

        output
    }

    /// 破壊的変更が許可されていない場合の拒否メッセージ
    pub fn format_destructive_error(&self, changes: &[Change], command: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "Destructive changes detected".red().bold()
        ));

        for change in changes.iter().filter(|c| c.destructive) {
            output.push_str(
                &format!("  [-] {}: {}", change.change_type, change.description)
                    .red()
                    .to_string(),
            );
            output.push('\n');
        }

        output.push('\n');
        output.push_str("To proceed, choose one of the following:\n");
        output.push_str(&format!("  1. Review changes: {} --dry-run\n", command));
        output.push_str(&format!(
            "  2. Allow destructive changes: {} --allow-destructive\n",
            command
        ));
        output.push_str(&format!(
            "  3. Apply only safe changes: {} --skip-destructive\n",
            command
        ));

        output
    }

    /// 破壊的変更が許可されている場合の警告
    pub fn format_destructive_warning(&self, changes: &[Change]) -> String {
        let destructive: Vec<&Change> = changes.iter().filter(|c| c.destructive).collect();
        if destructive.is_empty() {
            return String::new();
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{}\n",
            "Warning: Destructive changes allowed".yellow().bold()
        ));
        for change in destructive {
            output.push_str(&format!("  {}\n", change.description.yellow()));
        }
        output
    }
}
