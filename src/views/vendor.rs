use crate::api::ApiClient;
use crate::board::{BoardClient, BoardSnapshot, QueueStats};
use crate::model::{
    MenuItem, MenuItemCreate, MenuItemId, Order, OrderId, OrderStatus, TokenNumber,
};
use crate::orders::{check_transition, StatusAction};
use crate::polling::{refresh_board, OverlapPolicy, PollHandle, Poller};
use crate::session::{Route, Session};
use crate::views::ViewError;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// The vendor's operational dashboard: order queue, pickups and menu admin.
///
/// Status changes are never applied locally; every successful transition is
/// followed by a full re-fetch of the board.
pub struct VendorConsole {
    api: ApiClient,
    board: BoardClient,
    poll_interval: Duration,
    policy: OverlapPolicy,
    menu: Vec<MenuItem>,
    poller: Option<PollHandle>,
}

impl VendorConsole {
    pub fn new(api: ApiClient, board: BoardClient, poll_interval: Duration) -> Self {
        Self {
            api,
            board,
            poll_interval,
            policy: OverlapPolicy::default(),
            menu: Vec::new(),
            poller: None,
        }
    }

    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn require_vendor(&self) -> Result<Arc<Session>, ViewError> {
        let store = self.api.session();
        let session = store.current();
        match (Route::Vendor.guard(session.as_deref()), session) {
            (Route::Vendor, Some(session)) => Ok(session),
            (_, session) => {
                store.navigate(Route::Login);
                Err(match session {
                    Some(_) => ViewError::VendorOnly,
                    None => ViewError::LoginRequired,
                })
            }
        }
    }

    /// Initial load of orders and menu, then polling every interval.
    #[instrument(skip(self))]
    pub async fn open(&mut self) -> Result<BoardSnapshot, ViewError> {
        let session = self.require_vendor()?;
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }

        refresh_board(&self.api, &self.board).await?;
        self.reload_menu().await?;
        self.poller = Some(
            Poller::every(self.poll_interval)
                .policy(self.policy)
                .after_initial_load()
                .spawn(self.api.clone(), self.board.clone()),
        );
        info!(vendor = %session.username, "Vendor console open");
        Ok(self.board.snapshot().await?)
    }

    /// Re-fetches the order list now.
    pub async fn refresh(&self) -> Result<BoardSnapshot, ViewError> {
        self.require_vendor()?;
        refresh_board(&self.api, &self.board).await?;
        Ok(self.board.snapshot().await?)
    }

    /// Orders newest first.
    pub async fn orders(&self) -> Result<BoardSnapshot, ViewError> {
        Ok(self.board.snapshot().await?)
    }

    pub async fn stats(&self) -> Result<QueueStats, ViewError> {
        Ok(self.board.snapshot().await?.stats())
    }

    /// Requests `action` for an order on the board.
    ///
    /// The move is checked against the order's last known status before anything
    /// is sent. On failure local state is left as it was.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId, action: StatusAction) -> Result<Order, ViewError> {
        self.require_vendor()?;
        let snapshot = self.board.snapshot().await?;
        let current = snapshot
            .find(id)
            .map(|o| o.status)
            .ok_or(ViewError::UnknownOrder(id))?;
        self.transition(id, current, action).await
    }

    async fn transition(
        &self,
        id: OrderId,
        current: OrderStatus,
        action: StatusAction,
    ) -> Result<Order, ViewError> {
        let target = action.target();
        if let Err(e) = check_transition(current, target) {
            debug!(%id, %current, %target, "Transition refused locally");
            return Err(e.into());
        }

        let updated = self.api.update_order_status(id, target).await?;
        info!(%id, from = %current, to = %updated.status, "Order advanced");
        if let Err(e) = refresh_board(&self.api, &self.board).await {
            warn!(error = %e, "Refresh after transition failed");
        }
        Ok(updated)
    }

    /// Resolves a pickup token to its order via the backend.
    #[instrument(skip(self))]
    pub async fn lookup_token(&self, token: TokenNumber) -> Result<Order, ViewError> {
        self.require_vendor()?;
        let order = self.api.fetch_order_by_token(token).await?;
        info!(%token, id = %order.id, status = %order.status, "Token resolved");
        Ok(order)
    }

    /// Decodes a scanned pickup code and looks up its token.
    pub async fn scan_qr(&self, payload: &str) -> Result<Order, ViewError> {
        let token = parse_scanned_token(payload)?;
        self.lookup_token(token).await
    }

    /// Verifies the token and hands the order over: `ready → completed`.
    #[instrument(skip(self))]
    pub async fn complete_pickup(&self, token: TokenNumber) -> Result<Order, ViewError> {
        let order = self.lookup_token(token).await?;
        self.transition(order.id, order.status, StatusAction::CompletePickup)
            .await
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    /// The signed-in vendor's own items.
    pub fn own_items(&self) -> Vec<&MenuItem> {
        let Some(session) = self.api.session().current() else {
            return Vec::new();
        };
        self.menu
            .iter()
            .filter(|item| item.vendor_id.0 == session.user_id.0)
            .collect()
    }

    pub async fn reload_menu(&mut self) -> Result<&[MenuItem], ViewError> {
        self.menu = self.api.fetch_menu().await?;
        Ok(&self.menu)
    }

    #[instrument(skip(self))]
    pub async fn create_menu_item(&mut self, item: &MenuItemCreate) -> Result<MenuItem, ViewError> {
        self.require_vendor()?;
        let created = self.api.create_menu_item(item).await?;
        self.reload_menu().await?;
        Ok(created)
    }

    /// Flips `is_available` for a menu item and reloads the menu.
    #[instrument(skip(self))]
    pub async fn toggle_availability(&mut self, id: MenuItemId) -> Result<MenuItem, ViewError> {
        self.require_vendor()?;
        let current = self
            .menu
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.is_available)
            .ok_or(ViewError::UnknownItem(id))?;
        let updated = self.api.set_availability(id, !current).await?;
        self.reload_menu().await?;
        Ok(updated)
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_finished())
    }

    pub async fn close(mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }
}

/// Pulls the token out of a scanned pickup code (`{"id": .., "token": ..}`).
///
/// The token may be encoded as a number or a numeric string.
pub fn parse_scanned_token(payload: &str) -> Result<TokenNumber, ViewError> {
    let value: Value = serde_json::from_str(payload.trim())
        .map_err(|e| ViewError::InvalidCode(e.to_string()))?;
    match value.get("token") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(TokenNumber)
            .ok_or_else(|| ViewError::InvalidCode(format!("bad token {n}"))),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| ViewError::InvalidCode(format!("bad token {s}"))),
        _ => Err(ViewError::InvalidCode("no token".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scanned_token() {
        assert_eq!(
            parse_scanned_token(r#"{"id": 42, "token": 1234}"#).unwrap(),
            TokenNumber(1234)
        );
        assert_eq!(
            parse_scanned_token(r#"{"token": "77"}"#).unwrap(),
            TokenNumber(77)
        );
        assert!(parse_scanned_token("1234").is_err());
        assert!(parse_scanned_token(r#"{"id": 42}"#).is_err());
        assert!(parse_scanned_token(r#"{"token": -1}"#).is_err());
    }
}
