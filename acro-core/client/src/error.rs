//! Acropolis 客户端错误定义

use thiserror::Error;

/// Acropolis 客户端错误类型
#[derive(Error, Debug)]
pub enum AcroError {
    /// 服务端返回非成功状态码
    #[error("{method} {url}: {status}")]
    Http {
        method: String,
        url: String,
        status: u16,
    },

    /// 按名称未找到虚拟机
    #[error("未找到名为 {0:?} 的虚拟机")]
    NotFound(String),

    /// 虚拟机名称不唯一
    #[error("虚拟机名称 {name:?} 不唯一 (匹配 {count} 个)")]
    AmbiguousName { name: String, count: u64 },

    /// 查询结果中没有任何实体
    #[error("查询 {0:?} 的结果为空")]
    EmptyResult(String),

    /// 任务执行失败
    #[error("任务 {task_uuid} 失败: {code}: {detail}")]
    TaskFailed {
        task_uuid: String,
        code: String,
        detail: String,
    },

    /// 任务轮询次数耗尽
    #[error("任务 {task_uuid} 在 {attempts} 次轮询后仍未完成")]
    TaskTimeout { task_uuid: String, attempts: u32 },

    /// 参数错误
    #[error("参数错误: {0}")]
    InvalidArgument(String),

    /// 网络传输错误
    #[error("网络错误: {0}")]
    Transport(String),

    /// 响应解析错误
    #[error("解析 {url} 响应失败: {reason}")]
    Decode { url: String, reason: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

/// Acropolis 客户端结果类型
pub type Result<T> = std::result::Result<T, AcroError>;
