//! 克隆规格构建

use tracing::info;

use crate::models::{VmCloneSpec, VmDescriptor};
use crate::prune::strip_empty;

/// 第 `index` 个克隆的名称：`<base>-<index>`
pub fn clone_name(base: &str, index: u32) -> String {
    format!("{}-{}", base, index)
}

/// 根据源虚拟机描述生成 `count` 个已裁剪的克隆规格
///
/// 名称依次为 `<name>-0` .. `<name>-(count-1)`。
pub fn build_clone_specs(descriptor: &VmDescriptor, count: u32) -> Vec<serde_json::Value> {
    let base = &descriptor.config.name;
    (0..count)
        .map(|i| {
            let spec = VmCloneSpec::from_config(&descriptor.config, clone_name(base, i));
            info!("创建克隆 {}: {}", i, spec.name);
            // 由结构体序列化得到的 JSON 不会失败
            let value = serde_json::to_value(&spec).unwrap_or_default();
            strip_empty(&value)
        })
        .collect()
}
