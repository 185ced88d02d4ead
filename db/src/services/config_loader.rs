// 設定ファイル読み込みサービス
//
// core::config の純粋性を保つため、ファイルI/Oはこのサービスに集約する。

use crate::core::config::Config;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

/// 設定ファイル読み込みサービス
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// YAMLファイルから設定を読み込む
    ///
    /// 設定値内の `${ENV_VAR}` パターンを環境変数の値で展開します。
    /// 環境変数が未定義の場合は空文字列に置換されます。
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let expanded = Self::expand_env_vars(&content);
        serde_yaml::from_str(&expanded).with_context(|| "Failed to parse config file")
    }

    /// デフォルトパスから設定を読み込む
    pub fn load_default() -> Result<Config> {
        let path = Path::new(Config::DEFAULT_CONFIG_PATH);
        Self::from_file(path)
    }

    /// 文字列内の `${ENV_VAR}` パターンを環境変数の値で展開
    ///
    /// 環境変数が未定義の場合は空文字列に置換し、警告を出力します。
    fn expand_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex");
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    eprintln!(
                        "Warning: Environment variable '{}' is not defined, using empty string",
                        var_name
                    );
                    String::new()
                }
            }
        })
        .to_string()
    }
}
