use crate::harness::{CapturedEvent, init_test_tracing};
use authgate_core::conf::{ConfigOverrides, RuntimeConfig, load_config};
use authgate_core::decision::PolicyProfile;
use authgate_core::server::serve_with_shutdown;
use envoy_types::pb::envoy::service::auth::v3::authorization_client::AuthorizationClient;
use std::future::Future;
use std::net::TcpStream;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tonic::transport::Channel;
use tonic_health::pb::health_client::HealthClient;

/// Handle to a running authgate test server.
///
/// The server is stopped when the handle is dropped.
pub struct TestServer {
    endpoint: String,
    rt: Runtime,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start with the default policy.
    pub fn start() -> Self {
        Self::start_with(|_| {})
    }

    pub fn start_with_profile(profile: PolicyProfile) -> Self {
        Self::start_with(|cfg| cfg.policy.profile = profile)
    }

    /// Start on a free port after letting `patch` adjust the default config.
    ///
    /// This function is parallel-safe.
    pub fn start_with(patch: impl FnOnce(&mut RuntimeConfig)) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let port = free_port();
        let overrides = ConfigOverrides {
            listen: Some(format!("127.0.0.1:{port}")),
            ..ConfigOverrides::default()
        };

        let mut cfg = load_config(None, &overrides).expect("failed to build test config");
        patch(&mut cfg);

        let rt = Runtime::new().expect("failed to build test runtime");
        let (tx, rx) = oneshot::channel::<()>();

        rt.spawn(async move {
            let signal = async {
                let _ = rx.await;
            };
            if let Err(e) = serve_with_shutdown(cfg, signal).await {
                panic!("authgate test server failed: {e}");
            }
        });

        let addr = format!("127.0.0.1:{port}");
        wait_for_server(&addr);

        Self {
            endpoint: format!("http://{addr}"),
            rt,
            shutdown: Some(tx),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.rt.block_on(fut)
    }

    pub async fn authz_client(&self) -> AuthorizationClient<Channel> {
        AuthorizationClient::connect(self.endpoint.clone())
            .await
            .expect("failed to connect authorization client")
    }

    pub async fn health_client(&self) -> HealthClient<Channel> {
        let channel = async {
            tonic::transport::Endpoint::new(self.endpoint.clone())?
                .connect()
                .await
        }
        .await
        .expect("failed to connect health client");
        HealthClient::new(channel)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Poll until the listener accepts connections (or panic).
fn wait_for_server(addr: &str) {
    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", addr);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

pub fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Allocate a free port on localhost.
/// This is required to avoid port collisions when running tests in parallel.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
