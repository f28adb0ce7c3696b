//! 清理命令

use acro_client::AcropolisClient;
use anyhow::{Context, Result};
use colored::Colorize;

/// 删除 `<vm_name>-0` .. `<vm_name>-(num_clones-1)`，遇到错误立即停止
///
/// 克隆名称按生成规则视为唯一，解析时不检查重名。
pub async fn run(client: &AcropolisClient, vm_name: &str, num_clones: u32) -> Result<()> {
    client
        .vm()
        .cleanup_clones(vm_name, num_clones)
        .await
        .with_context(|| format!("清理 {} 的克隆失败", vm_name))?;

    println!(
        "{} 已删除 {} 的 {} 个克隆",
        "✅".green(),
        vm_name.bold(),
        num_clones
    );
    Ok(())
}
