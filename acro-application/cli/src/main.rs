//! acroclone CLI 应用
//!
//! - `--action clone`: 按 `--vm-name` 找到源虚拟机，一次性克隆 `--num-clones` 个
//! - `--action cleanup`: 删除 `<vm-name>-0` .. `<vm-name>-(num-clones-1)`

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};

mod commands;
mod config;

use config::RunConfig;

#[derive(Parser, Debug)]
#[command(name = "acroclone")]
#[command(about = "Acropolis 虚拟机批量克隆与清理工具", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 配置文件路径 (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// 运行模式 ('clone' 或 'cleanup')
    #[arg(long)]
    action: Option<String>,

    /// 集群地址 (CVM 或虚拟 IP)
    #[arg(long, alias = "cluster_ip")]
    cluster_ip: Option<String>,

    /// Prism 端口
    #[arg(long)]
    port: Option<u16>,

    /// Prism 用户名 (默认 admin)
    #[arg(long)]
    username: Option<String>,

    /// Prism 密码 (默认 admin)
    #[arg(long)]
    password: Option<String>,

    /// 虚拟机名称
    #[arg(long, alias = "vm_name")]
    vm_name: Option<String>,

    /// 克隆数量
    #[arg(long, alias = "num_clones", default_value_t = 1)]
    num_clones: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("acroclone 启动");

    let config = RunConfig::from_cli(&cli)?;
    commands::handle(config).await
}
