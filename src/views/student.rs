use crate::api::ApiClient;
use crate::board::{BoardClient, BoardSnapshot};
use crate::cart::{self, Cart};
use crate::model::{MenuItem, MenuItemId, Order, PickupCode, Prediction};
use crate::polling::{refresh_board, OverlapPolicy, PollHandle, Poller};
use crate::session::{Route, Session};
use crate::views::ViewError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Menu browsing, checkout and order tracking for a student.
pub struct StudentView {
    api: ApiClient,
    board: BoardClient,
    poll_interval: Duration,
    menu: Vec<MenuItem>,
    cart: Cart,
    poller: Option<PollHandle>,
}

impl StudentView {
    pub fn new(api: ApiClient, board: BoardClient, poll_interval: Duration) -> Self {
        Self {
            api,
            board,
            poll_interval,
            menu: Vec::new(),
            cart: Cart::new(),
            poller: None,
        }
    }

    fn require_session(&self) -> Result<Arc<Session>, ViewError> {
        match self.api.session().current() {
            Some(session) => Ok(session),
            None => {
                self.api.session().navigate(Route::Login);
                Err(ViewError::LoginRequired)
            }
        }
    }

    /// Loads the public menu. No session needed.
    #[instrument(skip(self))]
    pub async fn load_menu(&mut self) -> Result<&[MenuItem], ViewError> {
        self.menu = self.api.fetch_menu().await?;
        Ok(&self.menu)
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn search(&self, term: &str) -> Vec<&MenuItem> {
        cart::search(&self.menu, term)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds one unit of a menu item to the cart.
    pub fn add_to_cart(&mut self, id: MenuItemId) -> Result<u32, ViewError> {
        let item = self
            .menu
            .iter()
            .find(|item| item.id == id)
            .ok_or(ViewError::UnknownItem(id))?;
        if !item.is_available {
            return Err(ViewError::Unavailable(id));
        }
        self.cart.add(item);
        Ok(self.cart.quantity_of(id))
    }

    pub fn remove_from_cart(&mut self, id: MenuItemId) -> bool {
        self.cart.remove(id)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Estimated minutes until the current cart would be ready.
    #[instrument(skip(self))]
    pub async fn predict(&self) -> Result<Prediction, ViewError> {
        let order = self.cart.to_order()?;
        Ok(self.api.predict_pickup(&order).await?)
    }

    /// Sends the cart as a new order. The cart is cleared only on success.
    #[instrument(skip(self))]
    pub async fn place_order(&mut self) -> Result<Order, ViewError> {
        let request = self.cart.to_order()?;
        let session = self.require_session()?;

        match self.api.create_order(&request).await {
            Ok(order) => {
                info!(id = %order.id, username = %session.username, "Checkout complete");
                self.cart.clear();
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, units = self.cart.units(), "Checkout failed, cart kept");
                Err(e.into())
            }
        }
    }

    /// Loads the student's orders and keeps them fresh until [`StudentView::close`].
    #[instrument(skip(self))]
    pub async fn track(&mut self) -> Result<BoardSnapshot, ViewError> {
        self.require_session()?;
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
        refresh_board(&self.api, &self.board).await?;
        self.poller = Some(
            Poller::every(self.poll_interval)
                .policy(OverlapPolicy::Allow)
                .after_initial_load()
                .spawn(self.api.clone(), self.board.clone()),
        );
        Ok(self.board.snapshot().await?)
    }

    pub async fn orders(&self) -> Result<BoardSnapshot, ViewError> {
        Ok(self.board.snapshot().await?)
    }

    pub fn is_tracking(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_finished())
    }

    pub fn pickup_code(order: &Order) -> Option<PickupCode> {
        order.pickup_code()
    }

    /// Stops tracking.
    pub async fn close(mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }
}
