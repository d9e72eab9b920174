//! End-to-end fetch cycles against mock HTTP upstreams.
//!
//! Both the cluster RPC and the prediction service are `wiremock` servers;
//! the dashboard sees only the real HTTP clients.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pnode_common::{AnomalyStatus, ADDR_SENTINEL, VERSION_SENTINEL};
use pnode_dashboard::{
    health, ChatPanel, Dashboard, HealthStatus, Phase, SubmitOutcome, SyntheticMetricsSource,
    ViewState, CHAT_FALLBACK, EPOCH_PLACEHOLDER, FAILED_MESSAGE,
};
use pnode_directory::RpcNodeDirectory;
use pnode_predict::HttpPredictionClient;

const TIMEOUT: Option<Duration> = Some(Duration::from_secs(5));

fn cluster_body(nodes: serde_json::Value) -> serde_json::Value {
    json!({ "jsonrpc": "2.0", "id": 1, "result": nodes })
}

async fn mount_cluster(server: &MockServer, nodes: serde_json::Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "getClusterNodes" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_body(nodes)))
        .mount(server)
        .await;
}

fn dashboard_for(directory: &MockServer, prediction: &MockServer, seed: u64) -> Dashboard {
    let dir = RpcNodeDirectory::new(directory.uri(), TIMEOUT)
        .unwrap_or_else(|e| panic!("directory client: {}", e));
    let predictor = HttpPredictionClient::new(prediction.uri(), TIMEOUT)
        .unwrap_or_else(|e| panic!("prediction client: {}", e));
    Dashboard::new(
        Arc::new(dir),
        Arc::new(predictor),
        Box::new(SyntheticMetricsSource::with_rng(ChaCha20Rng::seed_from_u64(seed))),
    )
}

#[tokio::test]
async fn pubkey_only_nodes_with_prediction_service_down() {
    let directory = MockServer::start().await;
    let prediction = MockServer::start().await;
    mount_cluster(&directory, json!([{ "pubkey": "P1" }, { "pubkey": "P2" }])).await;
    // No routes mounted on `prediction`: every call answers 404.

    let mut dashboard = dashboard_for(&directory, &prediction, 7);
    let view = match dashboard.load().await {
        ViewState::Ready(view) => view.clone(),
        other => panic!("expected Ready, got {:?}", other),
    };

    assert_eq!(view.nodes.len(), 2);
    assert_eq!(view.stats.node_count, 2);
    assert_eq!(view.stats.epoch_count, EPOCH_PLACEHOLDER);
    assert_eq!(view.stats.risk_count, 0);

    for (node, expected) in view.nodes.iter().zip(["P1", "P2"]) {
        assert_eq!(node.node.pubkey, expected);
        assert_eq!(node.node.gossip_addr, ADDR_SENTINEL);
        assert_eq!(node.node.rpc_addr, ADDR_SENTINEL);
        assert_eq!(node.node.version, VERSION_SENTINEL);
        assert_eq!(node.node.feature_set, 0);
        assert_eq!(node.anomaly_status, AnomalyStatus::Healthy);
        assert_eq!(node.anomaly_score, None);
        assert_eq!(node.projected_reward, 0.0);
        assert!((500.0..700.0).contains(&node.storage_used));
    }

    let expected_tb = view.nodes.iter().map(|n| n.storage_used).sum::<f64>() / 1024.0;
    assert!((view.stats.total_storage_tb - expected_tb).abs() < 1e-9);
}

#[tokio::test]
async fn full_cycle_with_predictions() {
    let directory = MockServer::start().await;
    let prediction = MockServer::start().await;
    mount_cluster(
        &directory,
        json!([
            {
                "pubkey": "9QxCLckBiJc783jnMvXZubK4wH86Eqqvashtrwvcsgkv",
                "gossip": "10.0.0.1:8001",
                "tpu": "10.0.0.1:8003",
                "rpc": "10.0.0.1:8899",
                "version": "1.18.2",
                "featureSet": 4215500110u64,
                "shredVersion": 50093
            },
            { "pubkey": "B" },
            { "pubkey": "C" }
        ]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/analyze/anomalies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "status": "Healthy", "anomaly_score": 0.12 },
            { "status": "Risk", "anomaly_score": -0.08 },
            { "status": "Healthy", "anomaly_score": 0.05 }
        ])))
        .expect(1)
        .mount(&prediction)
        .await;

    Mock::given(method("POST"))
        .and(path("/predict/rewards"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "projected_epoch_reward": 2.5 })),
        )
        .expect(3)
        .mount(&prediction)
        .await;

    let mut dashboard = dashboard_for(&directory, &prediction, 11);
    let view = dashboard
        .load()
        .await
        .view()
        .cloned()
        .unwrap_or_else(|| panic!("expected Ready"));

    assert_eq!(view.nodes.len(), 3);
    assert_eq!(view.stats.risk_count, 1);

    let first = &view.nodes[0];
    assert_eq!(first.node.gossip_addr, "10.0.0.1:8001");
    assert_eq!(first.node.version, "1.18.2");
    assert_eq!(first.node.feature_set, 4215500110);
    assert_eq!(first.node.shred_version, 50093);
    assert_eq!(first.anomaly_score, Some(0.12));

    assert_eq!(view.nodes[1].anomaly_status, AnomalyStatus::Risk);
    assert_eq!(view.nodes[1].anomaly_score, Some(-0.08));
    assert!(view.nodes.iter().all(|n| n.projected_reward == 2.5));

    assert_eq!(dashboard.history(), &[Phase::Loading, Phase::Ready]);
}

#[tokio::test]
async fn failed_then_retry_succeeds() {
    let directory = MockServer::start().await;
    let prediction = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&directory)
        .await;
    mount_cluster(&directory, json!([{ "pubkey": "P1" }])).await;

    let mut dashboard = dashboard_for(&directory, &prediction, 3);

    match dashboard.load().await {
        ViewState::Failed { message } => assert_eq!(message, FAILED_MESSAGE),
        other => panic!("expected Failed, got {:?}", other),
    }
    // A failed directory read never reaches the prediction service.
    let requests = prediction.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());

    let state = dashboard.retry().await;
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.view().map(|v| v.nodes.len()), Some(1));

    assert_eq!(
        dashboard.history(),
        &[Phase::Loading, Phase::Failed, Phase::Loading, Phase::Ready]
    );
}

#[tokio::test]
async fn rpc_error_fails_the_cycle() {
    let directory = MockServer::start().await;
    let prediction = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32601, "message": "Method not found" }
        })))
        .mount(&directory)
        .await;

    let mut dashboard = dashboard_for(&directory, &prediction, 5);
    assert_eq!(dashboard.load().await.phase(), Phase::Failed);
}

#[tokio::test]
async fn chat_over_http() {
    let prediction = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({ "query": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "hi there" })))
        .mount(&prediction)
        .await;

    let client = HttpPredictionClient::new(prediction.uri(), TIMEOUT)
        .unwrap_or_else(|e| panic!("prediction client: {}", e));
    let panel = ChatPanel::new(Arc::new(client));

    match panel.submit("hello").await {
        SubmitOutcome::Answered(reply) => assert_eq!(reply.content, "hi there"),
        other => panic!("unexpected outcome {:?}", other),
    }

    // Unmatched query → 404 → fallback text.
    match panel.submit("something else").await {
        SubmitOutcome::Answered(reply) => assert_eq!(reply.content, CHAT_FALLBACK),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(panel.len(), 5);
    assert!(!panel.is_typing());
}

#[tokio::test]
async fn health_report_over_http() {
    let directory = MockServer::start().await;
    let prediction = MockServer::start().await;
    mount_cluster(&directory, json!([{ "pubkey": "P1" }])).await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "online",
            "models_trained": true,
            "ai_agent_active": false
        })))
        .mount(&prediction)
        .await;

    let dir = RpcNodeDirectory::new(directory.uri(), TIMEOUT)
        .unwrap_or_else(|e| panic!("directory client: {}", e));
    let predictor = HttpPredictionClient::new(prediction.uri(), TIMEOUT)
        .unwrap_or_else(|e| panic!("prediction client: {}", e));

    let report = health::check_all(&dir, &predictor).await;
    assert_eq!(report.overall, HealthStatus::Healthy);
    assert!(report.is_healthy());
    assert!(report.to_table().contains("Node Directory"));

    drop(prediction);
    let predictor = HttpPredictionClient::new("http://127.0.0.1:9", TIMEOUT)
        .unwrap_or_else(|e| panic!("prediction client: {}", e));
    let report = health::check_all(&dir, &predictor).await;
    assert_eq!(report.overall, HealthStatus::Unhealthy);
}
