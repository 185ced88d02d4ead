// shale-db
//
// SQLxベースのデータベースアダプターとサービス層。
// スキーマ抽出・スキーマファイル読み込み・計画適用・ダンプ出力を提供します。

pub mod adapters;
pub mod services;

pub use shale_core::core;
