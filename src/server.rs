use crate::config::Config;
use crate::core_backend::BackendFetcher;
use crate::core_listing::Synthesizer;
use crate::core_network::admission::{AdmissionController, ConnectionCounter};
use crate::core_network::network;
use crate::session::{Session, SessionTeardown};
use crate::watchdog::start_watchdog;
use anyhow::{Context, Result};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpListener;

/// Services shared by every session.
pub struct ServerContext {
    pub config: Arc<Config>,
    pub backend: BackendFetcher,
    pub synthesizer: Synthesizer,
    pub admission: AdmissionController,
}

impl ServerContext {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let backend = BackendFetcher::new(config.server.backend_connect_timeout())
            .context("Failed to build the backend HTTP client")?;
        let synthesizer = Synthesizer::new(Arc::clone(&config), backend.clone());
        let admission = AdmissionController::new(
            Arc::new(ConnectionCounter::new()),
            config.server.max_connections,
        );
        Ok(Self {
            config,
            backend,
            synthesizer,
            admission,
        })
    }
}

/// Runs the FTP proxy with the provided configuration.
///
/// Binds the command port and serves until the listener fails.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config);

    let address = (config.server.listen_address.clone(), config.server.listen_port);
    let listener = TcpListener::bind((address.0.as_str(), address.1))
        .await
        .with_context(|| format!("Failed to listen on {}:{}", address.0, address.1))?;
    info!("Listening on {}:{}", address.0, address.1);

    let context = Arc::new(ServerContext::new(config)?);
    match network::start_server(listener, context).await {
        Ok(_) => info!("Server stopped."),
        Err(e) => {
            error!("Server failed: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

/// Creates the state of a freshly admitted connection and arms its idle
/// watchdog.
pub fn initialize_session(
    writer: OwnedWriteHalf,
    local_addr: SocketAddr,
    context: Arc<ServerContext>,
) -> Session {
    let teardown = Arc::new(SessionTeardown::new(Arc::clone(context.admission.counter())));
    let watchdog = start_watchdog(context.config.server.initial_timeout(), Arc::clone(&teardown));
    Session::new(writer, local_addr, context, watchdog, teardown)
}
