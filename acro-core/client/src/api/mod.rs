//! Acropolis API 模块
//!
//! - 虚拟机管理 (VmApi)：名称解析、查询配置、批量克隆、删除、按命名规则清理克隆
//! - 任务管理 (TaskApi)：轮询异步任务直到结束

pub mod task;
pub mod vm;

pub use task::TaskApi;
pub use vm::VmApi;
