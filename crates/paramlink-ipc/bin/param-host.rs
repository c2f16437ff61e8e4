//! Parameter host process entry point
//!
//! Serves host-owned parameters to UI processes over a Unix socket.
//!
//! Usage: `param-host <socket-path> [parameter-count]`

use paramlink_ipc::{IpcError, Result};

#[cfg(unix)]
#[tokio::main]
async fn main() -> Result<()> {
    use paramlink_ipc::transport::TransportListener;
    use paramlink_ipc::{ParameterServer, ServerConfig};
    use std::env;
    use std::path::Path;

    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let socket_path = args
        .next()
        .ok_or_else(|| IpcError::InvalidConfig("socket path required as first argument".into()))?;
    let mut config = ServerConfig::default();
    if let Some(count) = args.next() {
        config.parameter_count = count
            .parse()
            .map_err(|e| IpcError::InvalidConfig(format!("parameter count {count:?}: {e}")))?;
    }

    let server = ParameterServer::new(config.clone())?;
    let listener = TransportListener::bind(Path::new(&socket_path)).await?;
    tracing::info!(
        socket = %socket_path,
        parameters = config.parameter_count,
        "parameter host ready, waiting for UI connections"
    );

    tokio::select! {
        result = server.run(listener) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("parameter host shutting down"),
    }

    Ok(())
}

#[cfg(not(unix))]
fn main() -> Result<()> {
    Err(IpcError::InvalidConfig(
        "param-host requires Unix domain sockets".into(),
    ))
}
