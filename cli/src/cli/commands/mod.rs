// CLIコマンド実装
//
// 各サブコマンドのハンドラーと共有の出力ヘルパーを提供します。

pub mod apply;
pub mod change_formatter;
pub mod diff;
pub mod dump;
pub mod init;

use serde::Serialize;

/// JSONモード用の構造化エラー出力
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    pub error: String,
}

impl ErrorOutput {
    /// 新しいErrorOutputを作成
    pub fn new(error: String) -> Self {
        Self { error }
    }

    /// JSON文字列へ変換
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| format!("{{\"error\": {:?}}}", self.error))
    }
}
