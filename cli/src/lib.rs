// shaleライブラリのエントリーポイント
//
// CLI層を公開し、既存のモジュールパス互換のため
// コアとDB層の各crateを再公開する。

pub mod cli;

pub use shale_core::core;
pub use shale_db::{adapters, services};
