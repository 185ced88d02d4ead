// アダプター層
// 外部システム（SQLite）との接続を担当する

pub mod database;
