// コマンド共通コンテキスト
//
// 設定ファイル読み込みやパス解決の重複をCLI層で集約する。
// 解決の優先順位は常に フラグ > 設定ファイル > デフォルト。

use crate::core::config::Config;
use crate::services::config_loader::ConfigLoader;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// 設定を読み込んでコンテキストを作成
    ///
    /// デフォルトパスに設定ファイルが存在しない場合はデフォルト設定で
    /// 続行します（必要なパスはフラグで渡される前提）。カスタムパスが
    /// 明示されたのに存在しない場合はエラーです。
    pub fn load(project_path: PathBuf, custom_config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match &custom_config_path {
            Some(path) => path.clone(),
            None => project_path.join(Config::DEFAULT_CONFIG_PATH),
        };

        let config = if config_path.exists() {
            ConfigLoader::from_file(&config_path)?
        } else if custom_config_path.is_some() {
            return Err(anyhow!("Config file not found: {:?}", config_path));
        } else {
            Config::default()
        };

        Ok(Self {
            project_path,
            config,
        })
    }

    /// データベースパスを解決
    pub fn resolve_database(&self, flag: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.config.database {
            return Ok(self.project_path.join(path));
        }
        Err(anyhow!(
            "Database path is required. Pass --database or set `database` in {}",
            Config::DEFAULT_CONFIG_PATH
        ))
    }

    /// スキーマディレクトリを解決して存在を確認
    pub fn resolve_schema_dir(&self, flag: Option<&Path>) -> Result<PathBuf> {
        let dir = match flag {
            Some(dir) => dir.to_path_buf(),
            None => self.project_path.join(&self.config.schema_dir),
        };
        if !dir.exists() {
            return Err(anyhow!("Schema directory not found: {:?}", dir));
        }
        Ok(dir)
    }

    /// バックアップ出力先を解決
    pub fn resolve_backup_path(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| self.config.backup_path.clone())
    }
}
