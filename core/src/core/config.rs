// 設定ドメインモデル
//
// プロジェクト設定（.shale.yaml）の型定義を提供します。
// ファイルI/Oはdb層のConfigLoaderが担当し、このモジュールは純粋に保ちます。
// すべての項目はコマンドラインフラグで上書きできます。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// プロジェクト設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 設定ファイルのバージョン
    #[serde(default = "default_version")]
    pub version: String,

    /// SQLiteデータベースファイルのパス（プロジェクトルートからの相対パス可）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// スキーマディレクトリ（プロジェクトルートからの相対パス）
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// 適用前バックアップの出力先（未設定ならバックアップしない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,
}

impl Config {
    /// デフォルトの設定ファイル名
    pub const DEFAULT_CONFIG_PATH: &'static str = ".shale.yaml";

    /// デフォルト値の設定を作成
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: None,
            schema_dir: default_schema_dir(),
            backup_path: None,
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.schema_dir, PathBuf::from("schema"));
        assert!(config.database.is_none());
        assert!(config.backup_path.is_none());
    }

    #[test]
    fn test_default_config_path() {
        assert_eq!(Config::DEFAULT_CONFIG_PATH, ".shale.yaml");
    }
}
