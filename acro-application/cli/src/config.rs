//! CLI 配置管理
//!
//! **数据来源**: 命令行参数 + 可选的 TOML 文件 (`--config`)
//!
//! 命令行参数优先于文件中的值；两者都未提供时使用内置默认值。
//! 所有来源合并成一个不可变的 [`RunConfig`]，之后不再读取任何全局状态。

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use acro_client::{AcroError, ClientConfig, Credentials, DEFAULT_PORT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Cli;

/// 默认用户名和密码
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 批量克隆
    Clone,
    /// 清理克隆
    Cleanup,
}

impl FromStr for Action {
    type Err = AcroError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "clone" => Ok(Action::Clone),
            "cleanup" => Ok(Action::Cleanup),
            other => Err(AcroError::InvalidArgument(format!(
                "未知的 --action {:?}，可选值为 'clone' 或 'cleanup'",
                other
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Clone => write!(f, "clone"),
            Action::Cleanup => write!(f, "cleanup"),
        }
    }
}

/// 配置文件内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// 集群地址 (CVM 或虚拟 IP)
    pub cluster_ip: Option<String>,

    /// Prism 端口
    pub port: Option<u16>,

    /// Prism 用户名
    pub username: Option<String>,

    /// Prism 密码
    pub password: Option<String>,

    /// HTTP 客户端与任务轮询配置
    #[serde(default)]
    pub client: ClientConfig,
}

impl FileConfig {
    /// 从指定路径加载配置，支持 `~` 展开
    pub fn load(path: &str) -> Result<Self> {
        let path = PathBuf::from(shellexpand::tilde(path).into_owned());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }
}

/// 一次运行所需的全部参数
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub action: Action,
    pub cluster_ip: String,
    pub port: u16,
    pub credentials: Credentials,
    pub vm_name: String,
    pub num_clones: u32,
    pub client: ClientConfig,
}

impl RunConfig {
    /// 合并命令行参数和配置文件
    ///
    /// 缺少必需参数或 action 无法识别时返回 [`AcroError::InvalidArgument`]，
    /// 此时还没有发出任何网络请求。
    pub fn resolve(cli: &Cli, file: FileConfig) -> std::result::Result<Self, AcroError> {
        let action = cli
            .action
            .as_deref()
            .ok_or_else(|| AcroError::InvalidArgument("缺少 --action".to_string()))?
            .parse::<Action>()?;

        let cluster_ip = cli
            .cluster_ip
            .clone()
            .or(file.cluster_ip)
            .ok_or_else(|| AcroError::InvalidArgument("缺少 --cluster-ip".to_string()))?;

        let vm_name = cli
            .vm_name
            .clone()
            .ok_or_else(|| AcroError::InvalidArgument("缺少 --vm-name".to_string()))?;

        let username = cli
            .username
            .clone()
            .or(file.username)
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let password = cli
            .password
            .clone()
            .or(file.password)
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

        Ok(Self {
            action,
            cluster_ip,
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            credentials: Credentials::new(username, password),
            vm_name,
            num_clones: cli.num_clones,
            client: file.client,
        })
    }

    /// 读取 `--config` 指定的文件（如有）并合并
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match cli.config.as_deref() {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(cli, file)?)
    }
}
