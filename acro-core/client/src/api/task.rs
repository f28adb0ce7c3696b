//! 任务管理 API
//!
//! 克隆、删除等修改操作都会返回一个异步任务，需要轮询到结束。

use reqwest::Method;
use tracing::info;

use crate::client::AcropolisClient;
use crate::error::{AcroError, Result};
use crate::models::{TaskPollResponse, TaskState};

/// 任务管理 API
pub struct TaskApi<'a> {
    client: &'a AcropolisClient,
}

impl<'a> TaskApi<'a> {
    /// 创建新的任务 API 实例
    pub(crate) fn new(client: &'a AcropolisClient) -> Self {
        Self { client }
    }

    /// 查询一次任务状态
    pub async fn poll_once(&self, task_uuid: &str) -> Result<TaskState> {
        let url = self.client.mgmt_url(&format!("tasks/{}/poll", task_uuid))?;
        let response: TaskPollResponse = self
            .client
            .request(Method::GET, url, None::<()>)
            .await?;
        Ok(response.state())
    }

    /// 轮询任务直到结束
    ///
    /// 响应中出现 `metaResponse` 即视为结束：错误码为 `kNoError` 时返回成功，
    /// 否则返回 [`AcroError::TaskFailed`]。
    ///
    /// 默认配置下两次轮询之间不等待，也没有次数上限；服务端一直不返回结果时
    /// 会无限轮询。需要限制时设置 `poll_interval_ms` / `poll_max_attempts`。
    pub async fn poll(&self, task_uuid: &str) -> Result<()> {
        let config = self.client.config();
        let interval = config.poll_interval();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            info!("轮询任务 {} (第 {} 次)", task_uuid, attempts);

            match self.poll_once(task_uuid).await? {
                TaskState::Succeeded => {
                    info!("任务 {} 完成", task_uuid);
                    return Ok(());
                }
                TaskState::Failed { code, detail } => {
                    return Err(AcroError::TaskFailed {
                        task_uuid: task_uuid.to_string(),
                        code,
                        detail,
                    });
                }
                TaskState::Pending => {}
            }

            if let Some(max) = config.poll_max_attempts {
                if attempts >= max {
                    return Err(AcroError::TaskTimeout {
                        task_uuid: task_uuid.to_string(),
                        attempts,
                    });
                }
            }

            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }
    }
}
