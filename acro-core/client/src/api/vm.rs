//! 虚拟机管理 API
//!
//! 提供克隆流程所需的虚拟机操作，包括：
//! - 名称解析：通过 Prism 网关按名称过滤查询虚拟机 UUID
//! - 查询配置：获取虚拟机描述
//! - 克隆操作：一次请求批量克隆，并等待任务结束
//! - 删除操作：删除虚拟机，并等待任务结束
//! - 清理克隆：按 `<name>-<i>` 命名规则依次删除

use chrono::Local;
use reqwest::Method;
use tracing::info;

use crate::client::AcropolisClient;
use crate::error::{AcroError, Result};
use crate::models::{
    strip_cluster_prefix, CloneRequest, GatewayVmList, TaskHandle, VmDescriptor,
};
use crate::spec::{build_clone_specs, clone_name};

/// 虚拟机管理 API
pub struct VmApi<'a> {
    client: &'a AcropolisClient,
}

impl<'a> VmApi<'a> {
    /// 创建新的虚拟机 API 实例
    pub(crate) fn new(client: &'a AcropolisClient) -> Self {
        Self { client }
    }

    /// 把虚拟机名称解析为 UUID
    ///
    /// # Arguments
    /// * `vm_name` - 虚拟机名称
    /// * `enforce_unique` - 为 true 时要求恰好匹配一个虚拟机
    ///
    /// 不要求唯一时不检查匹配数量，直接取第一个结果；结果为空时返回
    /// [`AcroError::EmptyResult`]。
    pub async fn resolve_uuid(&self, vm_name: &str, enforce_unique: bool) -> Result<String> {
        info!("解析虚拟机名称: {}", vm_name);

        let filter = format!("vm_name=={}", vm_name);
        let url = self
            .client
            .gateway_url("vms", &[("filterCriteria", filter.as_str())])?;
        let list: GatewayVmList = self
            .client
            .request(Method::GET, url, None::<()>)
            .await?;

        if enforce_unique {
            match list.metadata.count {
                0 => return Err(AcroError::NotFound(vm_name.to_string())),
                1 => {}
                count => {
                    return Err(AcroError::AmbiguousName {
                        name: vm_name.to_string(),
                        count,
                    })
                }
            }
        }

        let entity = list
            .entities
            .first()
            .ok_or_else(|| AcroError::EmptyResult(vm_name.to_string()))?;

        Ok(strip_cluster_prefix(&entity.vm_id).to_string())
    }

    /// 查询虚拟机描述
    pub async fn get(&self, vm_uuid: &str) -> Result<VmDescriptor> {
        info!("查询虚拟机配置: {}", vm_uuid);
        let url = self.client.mgmt_url(&format!("vms/{}", vm_uuid))?;
        self.client.request(Method::GET, url, None::<()>).await
    }

    /// 提交批量克隆请求并等待任务结束
    ///
    /// 所有克隆规格在同一个请求中提交，服务端只返回一个任务。
    pub async fn submit_clone(&self, vm_uuid: &str, specs: Vec<serde_json::Value>) -> Result<()> {
        info!("克隆虚拟机: {} (数量: {})", vm_uuid, specs.len());
        let url = self.client.mgmt_url(&format!("vms/{}/clone", vm_uuid))?;

        info!("克隆开始时间: {}", Local::now().format("%H:%M:%S"));
        let handle: TaskHandle = self
            .client
            .request(Method::POST, url, Some(CloneRequest { spec_list: specs }))
            .await?;
        self.client.task().poll(&handle.task_uuid).await?;
        info!("克隆结束时间: {}", Local::now().format("%H:%M:%S"));

        Ok(())
    }

    /// 以源虚拟机描述为模板克隆 `count` 个虚拟机
    ///
    /// # Example
    /// ```ignore
    /// let uuid = client.vm().resolve_uuid("web01", true).await?;
    /// let desc = client.vm().get(&uuid).await?;
    /// client.vm().create_clones(&uuid, &desc, 3).await?;
    /// ```
    pub async fn create_clones(
        &self,
        vm_uuid: &str,
        descriptor: &VmDescriptor,
        count: u32,
    ) -> Result<()> {
        let specs = build_clone_specs(descriptor, count);
        self.submit_clone(vm_uuid, specs).await
    }

    /// 删除虚拟机并等待任务结束
    pub async fn delete(&self, vm_uuid: &str) -> Result<()> {
        info!("删除虚拟机: {}", vm_uuid);
        let url = self.client.mgmt_url(&format!("vms/{}", vm_uuid))?;
        let handle: TaskHandle = self
            .client
            .request(Method::DELETE, url, None::<()>)
            .await?;
        self.client.task().poll(&handle.task_uuid).await
    }

    /// 按命名规则删除克隆 `<base_name>-0` .. `<base_name>-(count-1)`
    ///
    /// 按顺序逐个解析并删除，遇到第一个错误立即返回。
    pub async fn cleanup_clones(&self, base_name: &str, count: u32) -> Result<()> {
        for i in 0..count {
            let name = clone_name(base_name, i);
            info!("删除克隆 {}", name);
            let vm_uuid = self.resolve_uuid(&name, false).await?;
            self.delete(&vm_uuid).await?;
        }
        Ok(())
    }
}
