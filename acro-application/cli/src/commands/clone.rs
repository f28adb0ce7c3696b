//! 克隆命令

use acro_client::AcropolisClient;
use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

/// 找到唯一的源虚拟机，并在一个克隆任务中创建 `num_clones` 个克隆
pub async fn run(client: &AcropolisClient, vm_name: &str, num_clones: u32) -> Result<()> {
    let vm = client.vm();

    let vm_uuid = vm
        .resolve_uuid(vm_name, true)
        .await
        .with_context(|| format!("解析虚拟机 {} 失败", vm_name))?;
    info!("源虚拟机 {} -> {}", vm_name, vm_uuid);

    let descriptor = vm
        .get(&vm_uuid)
        .await
        .with_context(|| format!("获取虚拟机 {} 配置失败", vm_uuid))?;

    vm.create_clones(&vm_uuid, &descriptor, num_clones)
        .await
        .with_context(|| format!("克隆虚拟机 {} 失败", vm_name))?;

    println!(
        "{} 已从 {} 创建 {} 个克隆",
        "✅".green(),
        vm_name.bold(),
        num_clones
    );
    Ok(())
}
