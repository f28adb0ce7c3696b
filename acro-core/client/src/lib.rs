//! Acropolis / Prism 虚拟机克隆客户端
//!
//! 提供与 Acropolis 管理 API (v0.8) 和 Prism 网关 API (v1) 交互的客户端实现。
//!
//! # 功能
//!
//! - **虚拟机管理** (`VmApi`): 名称解析、查询配置、批量克隆、删除、清理克隆
//! - **任务管理** (`TaskApi`): 轮询异步任务直到结束
//! - **克隆规格** (`spec`): 从源虚拟机配置生成克隆规格
//! - **空值裁剪** (`prune`): 提交前递归移除空字段
//!
//! # 示例
//!
//! ```ignore
//! use acro_client::{AcropolisClient, ClientConfig, Credentials, Session};
//!
//! let session = Session::new("10.0.0.10", 9440, Credentials::default());
//! let client = AcropolisClient::new(session, ClientConfig::default())?;
//!
//! // 克隆虚拟机
//! let uuid = client.vm().resolve_uuid("web01", true).await?;
//! let desc = client.vm().get(&uuid).await?;
//! client.vm().create_clones(&uuid, &desc, 3).await?;
//!
//! // 清理克隆
//! client.vm().cleanup_clones("web01", 3).await?;
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod prune;
pub mod spec;

pub use client::{AcropolisClient, ClientConfig, Credentials, Session, DEFAULT_PORT};
pub use error::{AcroError, Result};

pub use api::{TaskApi, VmApi};

pub use models::{
    CloneRequest, GatewayVm, GatewayVmList, MetaResponse, TaskHandle, TaskPollResponse,
    TaskState, VmCloneSpec, VmConfig, VmDescriptor, TASK_NO_ERROR,
};

pub use prune::strip_empty;
pub use spec::{build_clone_specs, clone_name};
