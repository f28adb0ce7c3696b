//! Acropolis 客户端核心实现

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::api::{TaskApi, VmApi};
use crate::error::{AcroError, Result};

/// Prism 默认端口
pub const DEFAULT_PORT: u16 = 9440;

/// 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 连接超时（秒）
    pub connect_timeout: u64,

    /// 请求超时（秒）
    pub request_timeout: u64,

    /// 是否验证 SSL 证书
    pub verify_ssl: bool,

    /// 两次任务轮询之间的间隔（毫秒），0 表示不等待
    pub poll_interval_ms: u64,

    /// 任务轮询次数上限，None 表示一直轮询到任务结束
    pub poll_max_attempts: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            request_timeout: 30,
            verify_ssl: false,
            poll_interval_ms: 0,
            poll_max_attempts: None,
        }
    }
}

impl ClientConfig {
    /// 轮询间隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// 登录凭据
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("admin", "admin")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 一次调用期间使用的会话信息
#[derive(Debug, Clone)]
pub struct Session {
    cluster: String,
    credentials: Credentials,
    mgmt_base: String,
    gateway_base: String,
}

impl Session {
    /// 按集群地址生成标准的管理 API 和网关 API 地址
    pub fn new(cluster_ip: &str, port: u16, credentials: Credentials) -> Self {
        Self {
            cluster: cluster_ip.to_string(),
            credentials,
            mgmt_base: format!("https://{}:{}/api/nutanix/v0.8", cluster_ip, port),
            gateway_base: format!(
                "https://{}:{}/PrismGateway/services/rest/v1",
                cluster_ip, port
            ),
        }
    }

    /// 使用显式指定的 API 基础地址
    pub fn with_base_urls(mgmt_base: &str, gateway_base: &str, credentials: Credentials) -> Self {
        let mgmt_base = mgmt_base.trim_end_matches('/').to_string();
        let cluster = Url::parse(&mgmt_base)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| mgmt_base.clone());
        Self {
            cluster,
            credentials,
            mgmt_base,
            gateway_base: gateway_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn mgmt_base(&self) -> &str {
        &self.mgmt_base
    }

    pub fn gateway_base(&self) -> &str {
        &self.gateway_base
    }
}

/// Acropolis / Prism REST 客户端
pub struct AcropolisClient {
    /// 会话
    session: Session,

    /// HTTP 客户端
    http_client: Client,

    /// 配置
    config: ClientConfig,
}

impl AcropolisClient {
    /// 创建新的客户端
    pub fn new(session: Session, config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| AcroError::Config(e.to_string()))?;

        Ok(Self {
            session,
            http_client,
            config,
        })
    }

    /// 获取虚拟机管理 API
    pub fn vm(&self) -> VmApi<'_> {
        VmApi::new(self)
    }

    /// 获取任务 API
    pub fn task(&self) -> TaskApi<'_> {
        TaskApi::new(self)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 管理 API 地址
    pub(crate) fn mgmt_url(&self, path: &str) -> Result<Url> {
        build_url(self.session.mgmt_base(), path, &[])
    }

    /// 网关 API 地址
    pub(crate) fn gateway_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        build_url(self.session.gateway_base(), path, params)
    }

    /// 发送 HTTP 请求并把响应解析为指定类型
    pub(crate) async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<T>,
    ) -> Result<R> {
        debug!("Acropolis API 请求: {} {}", method, url);

        let credentials = self.session.credentials();
        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .basic_auth(&credentials.username, Some(&credentials.password));

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AcroError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("API 请求失败: {} {} - {}", method, url, status);
            return Err(AcroError::Http {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AcroError::Transport(e.to_string()))?;

        serde_json::from_str::<R>(&text).map_err(|e| AcroError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// 由基础地址、相对路径和查询参数拼出完整 URL
fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    let raw = format!("{}/{}", base, path);
    let parsed = if params.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, params)
    };
    parsed.map_err(|e| AcroError::Config(format!("无效的 URL {}: {}", raw, e)))
}
