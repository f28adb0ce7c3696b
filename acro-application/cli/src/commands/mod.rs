//! CLI 命令处理模块

pub mod cleanup;
pub mod clone;
pub mod common; // 公共工具函数

use acro_client::AcropolisClient;
use anyhow::Result;
use tracing::info;

use crate::config::{Action, RunConfig};

/// 创建客户端并执行配置中的操作
pub async fn handle(config: RunConfig) -> Result<()> {
    let client = common::create_client(&config)?;
    execute(&client, &config).await
}

/// 按 action 分发到克隆或清理流程
pub async fn execute(client: &AcropolisClient, config: &RunConfig) -> Result<()> {
    info!(
        "执行 {}: 虚拟机 {}, 数量 {}",
        config.action, config.vm_name, config.num_clones
    );

    match config.action {
        Action::Clone => clone::run(client, &config.vm_name, config.num_clones).await,
        Action::Cleanup => cleanup::run(client, &config.vm_name, config.num_clones).await,
    }
}
