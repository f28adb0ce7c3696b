//! 公共工具函数模块

use acro_client::{AcropolisClient, Session};
use anyhow::{Context, Result};
use tracing::info;

use crate::config::RunConfig;

/// 按运行配置创建 Acropolis 客户端
pub fn create_client(config: &RunConfig) -> Result<AcropolisClient> {
    let session = Session::new(&config.cluster_ip, config.port, config.credentials.clone());
    info!(
        "连接集群 {} (用户: {})",
        session.cluster(),
        config.credentials.username
    );

    AcropolisClient::new(session, config.client.clone()).context("创建 Acropolis 客户端失败")
}
