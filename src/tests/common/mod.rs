// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::{Arc, Once};
use std::time::Duration;

use crate::config::{ConfigRegistry, ServiceConfiguration};
use crate::family::ServiceFamily;
use crate::poll::PollSettings;
use crate::services::ServiceCore;
use crate::TokenManager;

static TRACING: Once = Once::new();

/// Log output for failing tests, controlled by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Complete configuration whose auth and service base URLs both point at
/// the stub server.
pub fn stub_config(name: &str, addr: SocketAddr) -> ServiceConfiguration {
    ServiceConfiguration {
        name: name.to_string(),
        auth_base_url: format!("http://{addr}"),
        service_base_url: format!("http://{addr}"),
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        token_grant_type: "client_credentials".into(),
        token_scope: "environment_authorization".into(),
        environment: Some("test-env".into()),
    }
}

/// Registry with a single "default" configuration for `family`.
pub async fn registry_with_default(
    family: ServiceFamily,
    addr: SocketAddr,
) -> Arc<ConfigRegistry> {
    let registry = Arc::new(ConfigRegistry::new());
    registry.register(family, stub_config("default", addr)).await;
    registry
}

/// Core wired to the stub server, with poll intervals short enough for
/// tests.
pub async fn stub_core(family: ServiceFamily, addr: SocketAddr) -> Arc<ServiceCore> {
    let registry = registry_with_default(family, addr).await;
    let tokens = Arc::new(TokenManager::new());
    Arc::new(
        ServiceCore::new(registry, tokens).with_poll_settings(PollSettings {
            max_attempts: 5,
            sleep_interval: Duration::from_millis(20),
        }),
    )
}

/// Token endpoint stub payload.
pub fn token_response(token: &str, expires_in: u64) -> serde_json::Value {
    json!({ "access_token": token, "expires_in": expires_in })
}
