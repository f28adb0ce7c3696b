//! Acropolis / Prism 数据模型
//!
//! 只声明本工具实际读写的字段，服务端返回的其余字段在反序列化时忽略。
//! 必需字段缺失时直接返回解析错误，不做默认值填充。

use serde::{Deserialize, Serialize};

/// 任务成功完成时 `metaResponse.error` 的取值
pub const TASK_NO_ERROR: &str = "kNoError";

// ============================================
// Prism Gateway (v1)
// ============================================

/// 网关按名称过滤虚拟机的响应
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayVmList {
    /// 分页元数据
    pub metadata: ListMetadata,

    /// 匹配的虚拟机
    #[serde(default)]
    pub entities: Vec<GatewayVm>,
}

/// 列表元数据
#[derive(Debug, Clone, Deserialize)]
pub struct ListMetadata {
    /// 匹配总数
    pub count: u64,
}

/// 网关返回的虚拟机条目
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayVm {
    /// 虚拟机 ID，可能带有 `<cluster>::` 前缀
    pub vm_id: String,
}

// ============================================
// Acropolis 管理 API (v0.8)
// ============================================

/// 虚拟机描述
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmDescriptor {
    /// 虚拟机配置
    pub config: VmConfig,
}

/// 虚拟机配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmConfig {
    /// 虚拟机名称
    pub name: String,

    /// vCPU 数量
    pub num_vcpus: u32,

    /// 内存大小 (MB)
    pub memory_mb: u64,

    /// 网卡列表
    #[serde(default)]
    pub vm_nics: Vec<serde_json::Value>,
}

/// 单个克隆目标
///
/// 字段与服务端的 clone proto 对应；空值字段在提交前会被裁剪掉。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmCloneSpec {
    /// vCPU 数量
    pub num_vcpus: u32,

    /// 是否覆盖源虚拟机网络配置（服务端接受字符串形式）
    pub override_network_config: String,

    /// 克隆后的名称
    pub name: String,

    /// 内存大小 (MB)
    pub memory_mb: u64,

    /// 指定 UUID，留空由服务端分配
    pub uuid: String,

    /// 网卡列表
    pub vm_nics: Vec<serde_json::Value>,

    /// 源虚拟机逻辑时间戳
    #[serde(rename = "sourceVMLogicalTimestamp")]
    pub source_vm_logical_timestamp: String,
}

impl VmCloneSpec {
    /// 以源虚拟机配置为模板，生成指定名称的克隆目标
    pub fn from_config(config: &VmConfig, name: String) -> Self {
        Self {
            num_vcpus: config.num_vcpus,
            override_network_config: "false".to_string(),
            name,
            memory_mb: config.memory_mb,
            uuid: String::new(),
            vm_nics: Vec::new(),
            source_vm_logical_timestamp: String::new(),
        }
    }
}

/// 批量克隆请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneRequest {
    /// 已裁剪的克隆目标列表
    pub spec_list: Vec<serde_json::Value>,
}

/// 异步操作返回的任务句柄
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHandle {
    /// 任务 UUID
    pub task_uuid: String,
}

/// 任务轮询响应
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPollResponse {
    /// 任务信息
    pub task_info: TaskInfo,
}

/// 任务信息
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    /// 完成后才会出现
    pub meta_response: Option<MetaResponse>,
}

/// 任务完成结果
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    /// 错误码，成功时为 `kNoError`
    pub error: String,

    /// 错误详情
    #[serde(default)]
    pub error_detail: Option<String>,
}

/// 任务轮询状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    /// 尚未完成，需要继续轮询
    Pending,
    /// 成功完成
    Succeeded,
    /// 失败
    Failed { code: String, detail: String },
}

impl TaskPollResponse {
    /// 根据响应内容判定任务状态
    pub fn state(&self) -> TaskState {
        match &self.task_info.meta_response {
            None => TaskState::Pending,
            Some(mr) if mr.error == TASK_NO_ERROR => TaskState::Succeeded,
            Some(mr) => TaskState::Failed {
                code: mr.error.clone(),
                detail: mr.error_detail.clone().unwrap_or_default(),
            },
        }
    }
}

/// 去掉 Prism 附加的集群前缀，只保留最后一个 `:` 之后的部分
pub fn strip_cluster_prefix(vm_id: &str) -> &str {
    vm_id.rsplit(':').next().unwrap_or(vm_id)
}
