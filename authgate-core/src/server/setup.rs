use crate::conf::RuntimeConfig;
use crate::server::authz::AuthzService;
use crate::server::error::ServerError;
use crate::server::health::LivenessService;
use std::future::Future;
use std::sync::Arc;
use tonic::transport::Server;

/// Serve until SIGINT or SIGTERM.
pub async fn run(config: RuntimeConfig) -> Result<(), ServerError> {
    serve_with_shutdown(config, shutdown_signal()).await
}

/// Serve the authorization and liveness services until `signal` resolves.
///
/// The policy is moved into the services here; nothing is kept at process scope.
pub async fn serve_with_shutdown<F>(config: RuntimeConfig, signal: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    let addr = config.server.listen;
    let max_concurrent_streams = config.server.max_concurrent_streams;
    let profile = config.policy.profile;
    let policy = Arc::new(config.policy);

    tracing::info!(
        %addr,
        profile = profile.as_str(),
        signal_header = %policy.signal_header,
        max_concurrent_streams,
        "Starting authgate ext_authz gRPC server"
    );

    Server::builder()
        .max_concurrent_streams(max_concurrent_streams)
        .add_service(AuthzService::new(policy).into_server())
        .add_service(LivenessService.into_server())
        .serve_with_shutdown(addr, signal)
        .await
        .map_err(|e| ServerError::transport(addr, e))?;

    tracing::info!(%addr, "authgate stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown requested");
}
