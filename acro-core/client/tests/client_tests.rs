//! Acropolis 客户端集成测试
//!
//! 使用 mockito 模拟 Prism 网关和 Acropolis 管理 API。

use acro_client::*;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;

const MGMT: &str = "/api/nutanix/v0.8";
const GATEWAY: &str = "/PrismGateway/services/rest/v1";
// admin:admin
const BASIC_AUTH: &str = "Basic YWRtaW46YWRtaW4=";

fn client_for(server: &ServerGuard, config: ClientConfig) -> AcropolisClient {
    let session = Session::with_base_urls(
        &format!("{}{}", server.url(), MGMT),
        &format!("{}{}", server.url(), GATEWAY),
        Credentials::default(),
    );
    AcropolisClient::new(session, config).unwrap()
}

async fn mock_lookup(
    server: &mut ServerGuard,
    name: &str,
    count: u64,
    vm_ids: &[&str],
    hits: usize,
) -> Mock {
    let entities: Vec<_> = vm_ids.iter().map(|id| json!({ "vmId": id })).collect();
    server
        .mock("GET", format!("{}/vms", GATEWAY).as_str())
        .match_query(Matcher::UrlEncoded(
            "filterCriteria".into(),
            format!("vm_name=={}", name),
        ))
        .match_header("authorization", BASIC_AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "metadata": { "count": count }, "entities": entities }).to_string())
        .expect(hits)
        .create_async()
        .await
}

async fn mock_task(server: &mut ServerGuard, task_uuid: &str, body: serde_json::Value) -> Mock {
    server
        .mock("GET", format!("{}/tasks/{}/poll", MGMT, task_uuid).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

fn pending() -> serde_json::Value {
    json!({ "taskInfo": { "percentageComplete": 10 } })
}

fn completed(code: &str, detail: &str) -> serde_json::Value {
    json!({ "taskInfo": { "metaResponse": { "error": code, "errorDetail": detail } } })
}

// ============================================
// 名称解析
// ============================================

#[tokio::test]
async fn test_resolve_unique_strips_cluster_prefix() {
    let mut server = Server::new_async().await;
    let lookup = mock_lookup(&mut server, "web01", 1, &["00051a2b::9f8e7d6c-uuid"], 1).await;

    let client = client_for(&server, ClientConfig::default());
    let uuid = client.vm().resolve_uuid("web01", true).await.unwrap();

    assert_eq!(uuid, "9f8e7d6c-uuid");
    lookup.assert_async().await;
}

#[tokio::test]
async fn test_resolve_unique_not_found() {
    let mut server = Server::new_async().await;
    let _lookup = mock_lookup(&mut server, "ghost", 0, &[], 1).await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().resolve_uuid("ghost", true).await;

    assert!(matches!(result, Err(AcroError::NotFound(name)) if name == "ghost"));
}

#[tokio::test]
async fn test_resolve_unique_ambiguous() {
    let mut server = Server::new_async().await;
    let _lookup = mock_lookup(&mut server, "web01", 2, &["c::a", "c::b"], 1).await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().resolve_uuid("web01", true).await;

    match result {
        Err(AcroError::AmbiguousName { name, count }) => {
            assert_eq!(name, "web01");
            assert_eq!(count, 2);
        }
        other => panic!("Expected AmbiguousName, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolve_relaxed_takes_first_match() {
    let mut server = Server::new_async().await;
    let _lookup = mock_lookup(&mut server, "web01-0", 2, &["c::first", "c::second"], 1).await;

    let client = client_for(&server, ClientConfig::default());
    let uuid = client.vm().resolve_uuid("web01-0", false).await.unwrap();

    assert_eq!(uuid, "first");
}

#[tokio::test]
async fn test_resolve_relaxed_empty_result() {
    let mut server = Server::new_async().await;
    let _lookup = mock_lookup(&mut server, "web01-0", 0, &[], 1).await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().resolve_uuid("web01-0", false).await;

    assert!(matches!(result, Err(AcroError::EmptyResult(_))));
}

#[tokio::test]
async fn test_resolve_http_error_carries_method_url_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", format!("{}/vms", GATEWAY).as_str())
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().resolve_uuid("web01", true).await;

    match result {
        Err(AcroError::Http { method, url, status }) => {
            assert_eq!(method, "GET");
            assert_eq!(status, 401);
            assert!(url.contains("/PrismGateway/services/rest/v1/vms?filterCriteria="));
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}

// ============================================
// 虚拟机配置
// ============================================

#[tokio::test]
async fn test_get_descriptor() {
    let mut server = Server::new_async().await;
    let get = server
        .mock("GET", format!("{}/vms/vm-1", MGMT).as_str())
        .match_header("authorization", BASIC_AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "uuid": "vm-1",
                "config": { "name": "web01", "numVcpus": 2, "memoryMb": 4096 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::default());
    let desc = client.vm().get("vm-1").await.unwrap();

    assert_eq!(desc.config.name, "web01");
    assert_eq!(desc.config.num_vcpus, 2);
    assert_eq!(desc.config.memory_mb, 4096);
    assert!(desc.config.vm_nics.is_empty());
    get.assert_async().await;
}

#[tokio::test]
async fn test_get_descriptor_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", format!("{}/vms/missing", MGMT).as_str())
        .with_status(404)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().get("missing").await;

    assert!(matches!(result, Err(AcroError::Http { status: 404, .. })));
}

#[tokio::test]
async fn test_get_descriptor_missing_field_is_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", format!("{}/vms/vm-1", MGMT).as_str())
        .with_status(200)
        .with_body(json!({ "config": { "name": "web01" } }).to_string())
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().get("vm-1").await;

    match result {
        Err(AcroError::Decode { url, .. }) => assert!(url.ends_with("/vms/vm-1")),
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

// ============================================
// 任务轮询
// ============================================

#[tokio::test]
async fn test_poll_succeeds_after_pending_responses() {
    let mut server = Server::new_async().await;
    let waiting = server
        .mock("GET", format!("{}/tasks/t-1/poll", MGMT).as_str())
        .with_status(200)
        .with_body(pending().to_string())
        .expect(3)
        .create_async()
        .await;
    let done = mock_task(&mut server, "t-1", completed("kNoError", "")).await;

    let client = client_for(&server, ClientConfig::default());
    client.task().poll("t-1").await.unwrap();

    waiting.assert_async().await;
    done.assert_async().await;
}

#[tokio::test]
async fn test_poll_task_failed() {
    let mut server = Server::new_async().await;
    let _task = mock_task(&mut server, "t-2", completed("kNoSpace", "container full")).await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.task().poll("t-2").await;

    match result {
        Err(AcroError::TaskFailed { task_uuid, code, detail }) => {
            assert_eq!(task_uuid, "t-2");
            assert_eq!(code, "kNoSpace");
            assert_eq!(detail, "container full");
        }
        other => panic!("Expected TaskFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_poll_gives_up_after_max_attempts() {
    let mut server = Server::new_async().await;
    let waiting = server
        .mock("GET", format!("{}/tasks/t-3/poll", MGMT).as_str())
        .with_status(200)
        .with_body(pending().to_string())
        .expect(3)
        .create_async()
        .await;

    let config = ClientConfig {
        poll_interval_ms: 1,
        poll_max_attempts: Some(3),
        ..Default::default()
    };
    let client = client_for(&server, config);
    let result = client.task().poll("t-3").await;

    assert!(matches!(
        result,
        Err(AcroError::TaskTimeout { attempts: 3, .. })
    ));
    waiting.assert_async().await;
}

// ============================================
// 克隆与清理
// ============================================

#[tokio::test]
async fn test_clone_flow_single_batch_request() {
    let mut server = Server::new_async().await;
    let lookup = mock_lookup(&mut server, "web01", 1, &["cluster::src-uuid"], 1).await;
    let get = server
        .mock("GET", format!("{}/vms/src-uuid", MGMT).as_str())
        .with_status(200)
        .with_body(
            json!({ "config": { "name": "web01", "numVcpus": 2, "memoryMb": 2048, "vmNics": [] } })
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let clone = server
        .mock("POST", format!("{}/vms/src-uuid/clone", MGMT).as_str())
        .match_header("authorization", BASIC_AUTH)
        .match_body(Matcher::Json(json!({
            "specList": [
                { "numVcpus": 2, "overrideNetworkConfig": "false", "name": "web01-0", "memoryMb": 2048 },
                { "numVcpus": 2, "overrideNetworkConfig": "false", "name": "web01-1", "memoryMb": 2048 },
                { "numVcpus": 2, "overrideNetworkConfig": "false", "name": "web01-2", "memoryMb": 2048 },
            ]
        })))
        .with_status(200)
        .with_body(json!({ "taskUuid": "clone-task" }).to_string())
        .expect(1)
        .create_async()
        .await;
    let task = mock_task(&mut server, "clone-task", completed("kNoError", "")).await;

    let client = client_for(&server, ClientConfig::default());
    let vm = client.vm();
    let uuid = vm.resolve_uuid("web01", true).await.unwrap();
    let desc = vm.get(&uuid).await.unwrap();
    vm.create_clones(&uuid, &desc, 3).await.unwrap();

    lookup.assert_async().await;
    get.assert_async().await;
    clone.assert_async().await;
    task.assert_async().await;
}

#[tokio::test]
async fn test_clone_propagates_task_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", format!("{}/vms/src/clone", MGMT).as_str())
        .with_status(200)
        .with_body(json!({ "taskUuid": "bad-task" }).to_string())
        .create_async()
        .await;
    let _task = mock_task(&mut server, "bad-task", completed("kInvalidArgument", "name taken")).await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().submit_clone("src", vec![json!({ "name": "x-0" })]).await;

    assert!(matches!(result, Err(AcroError::TaskFailed { code, .. }) if code == "kInvalidArgument"));
}

#[tokio::test]
async fn test_cleanup_deletes_in_order() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for i in 0..3 {
        let name = format!("web01-{}", i);
        let vm_id = format!("c::uuid-{}", i);
        mocks.push(mock_lookup(&mut server, &name, 1, &[vm_id.as_str()], 1).await);
        mocks.push(
            server
                .mock("DELETE", format!("{}/vms/uuid-{}", MGMT, i).as_str())
                .with_status(200)
                .with_body(json!({ "taskUuid": format!("del-{}", i) }).to_string())
                .expect(1)
                .create_async()
                .await,
        );
        mocks.push(mock_task(&mut server, &format!("del-{}", i), completed("kNoError", "")).await);
    }

    let client = client_for(&server, ClientConfig::default());
    client.vm().cleanup_clones("web01", 3).await.unwrap();

    for mock in &mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_cleanup_stops_at_first_missing_clone() {
    let mut server = Server::new_async().await;
    let _lookup = mock_lookup(&mut server, "web01-0", 1, &["c::uuid-0"], 1).await;
    let first_delete = server
        .mock("DELETE", format!("{}/vms/uuid-0", MGMT).as_str())
        .with_status(200)
        .with_body(json!({ "taskUuid": "del-0" }).to_string())
        .expect(1)
        .create_async()
        .await;
    let _task = mock_task(&mut server, "del-0", completed("kNoError", "")).await;
    let _lookup = mock_lookup(&mut server, "web01-1", 0, &[], 1).await;
    let third_lookup = mock_lookup(&mut server, "web01-2", 1, &["c::uuid-2"], 0).await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().cleanup_clones("web01", 3).await;

    assert!(matches!(result, Err(AcroError::EmptyResult(name)) if name == "web01-1"));
    first_delete.assert_async().await;
    third_lookup.assert_async().await;
}

#[tokio::test]
async fn test_delete_http_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("DELETE", format!("{}/vms/uuid-9", MGMT).as_str())
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server, ClientConfig::default());
    let result = client.vm().delete("uuid-9").await;

    match result {
        Err(AcroError::Http { method, status, .. }) => {
            assert_eq!(method, "DELETE");
            assert_eq!(status, 500);
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}
