use crate::api::ApiClient;
use crate::board::{self, BoardClient};
use crate::config::{ClientConfig, ConfigError};
use crate::model::{Credentials, RegisteredUser, Registration};
use crate::session::{FileStorage, Route, SessionStorage, SessionStore};
use crate::views::{StudentView, VendorConsole, ViewError};
use canteen_transport::{HttpTransport, Transport, TransportError};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The client runtime: one session, one order board, any number of views.
///
/// # Example
///
/// ```ignore
/// let app = CanteenApp::new(ClientConfig::load()?)?;
/// app.login(&credentials).await?;
///
/// let mut console = app.vendor();
/// console.open().await?;
/// // ...
/// console.close().await;
/// app.shutdown().await?;
/// ```
pub struct CanteenApp {
    pub api: ApiClient,
    pub session: SessionStore,
    pub board: BoardClient,
    config: ClientConfig,
    board_handle: JoinHandle<()>,
    watcher: JoinHandle<()>,
}

impl CanteenApp {
    /// HTTP transport and file-backed session, as configured.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let transport = HttpTransport::new(config.api_url.clone(), config.timeout)?;
        let storage = FileStorage::new(config.session_file.clone());
        Ok(Self::with_parts(Arc::new(transport), Arc::new(storage), config))
    }

    /// Wires the runtime over any transport and storage. Must be called inside a
    /// Tokio runtime.
    pub fn with_parts(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn SessionStorage>,
        config: ClientConfig,
    ) -> Self {
        let session = SessionStore::restore(storage);
        let api = ApiClient::new(transport, session.clone());

        // Buffer of 32 pending board requests
        let (board, board_handle) = board::spawn(32);
        let watcher = tokio::spawn(clear_board_on_teardown(session.clone(), board.clone()));

        info!(api_url = %config.api_url, signed_in = session.current().is_some(), "Client started");
        Self {
            api,
            session,
            board,
            config,
            board_handle,
            watcher,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn student(&self) -> StudentView {
        StudentView::new(self.api.clone(), self.board.clone(), self.config.student_poll)
    }

    pub fn vendor(&self) -> VendorConsole {
        VendorConsole::new(self.api.clone(), self.board.clone(), self.config.vendor_poll)
    }

    /// Signs in and returns the landing route for the account's role.
    pub async fn login(&self, credentials: &Credentials) -> Result<Route, ViewError> {
        let session = self.api.login(credentials).await?;
        self.board.clear().await?;
        Ok(self.session.login(session)?)
    }

    pub async fn register(&self, registration: &Registration) -> Result<RegisteredUser, ViewError> {
        Ok(self.api.register(registration).await?)
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Stops background tasks and waits for the board to drain.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down client...");

        self.watcher.abort();
        drop(self.api);
        drop(self.board);

        if let Err(e) = self.board_handle.await {
            error!("Order board task failed: {:?}", e);
            return Err(format!("Order board task failed: {:?}", e));
        }

        info!("Client shutdown complete.");
        Ok(())
    }
}

async fn clear_board_on_teardown(session: SessionStore, board: BoardClient) {
    let mut rx = session.subscribe();
    drop(session);
    while rx.changed().await.is_ok() {
        let ended = rx.borrow_and_update().is_none();
        if ended && board.clear().await.is_err() {
            break;
        }
    }
}
