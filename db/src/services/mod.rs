// サービス層
// スキーマ同期のユースケースを実装する

pub mod config_loader;
pub mod file_tree;
pub mod schema_applier;
pub mod schema_dumper;
pub mod schema_extractor;
pub mod schema_loader;
pub mod schema_sync;
