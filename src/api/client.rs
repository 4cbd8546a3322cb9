use crate::api::ApiError;
use crate::model::{
    Credentials, MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate, Order, OrderCreate,
    OrderId, OrderStatus, Prediction, RegisteredUser, Registration, TokenGrant, TokenNumber,
};
use crate::session::{Session, SessionStore};
use canteen_transport::{ApiRequest, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Which session a request is sent under.
enum Credential {
    /// Whatever session is current when the request goes out.
    Current,
    /// Only this session; nothing is sent once it is no longer current.
    Pinned(Arc<Session>),
    /// No bearer. A 401 is a credential rejection, not an expired session.
    Anonymous,
}

/// Typed access to the canteen backend.
///
/// Cloning is cheap; clones share the transport and the session store.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    async fn call(&self, request: ApiRequest, credential: Credential) -> Result<Value, ApiError> {
        let label = request.label();
        let anonymous = matches!(credential, Credential::Anonymous);
        let sent_with = match credential {
            Credential::Current => self.session.current(),
            Credential::Pinned(bound) => {
                let current = self.session.current();
                if !current.is_some_and(|s| Arc::ptr_eq(&s, &bound)) {
                    debug!(%label, "Session changed, request not sent");
                    return Err(ApiError::SessionChanged);
                }
                Some(bound)
            }
            Credential::Anonymous => None,
        };
        let request = request.bearer(sent_with.as_ref().map(|s| s.token.clone()));
        debug!(%label, "Sending request");

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(%label, error = %e, "Transport failure");
            ApiError::Network(e)
        })?;

        if response.is_success() {
            return Ok(response.body);
        }
        match response.status {
            401 if anonymous => {
                let message = response.failure_message();
                warn!(%label, %message, "Credentials rejected");
                Err(ApiError::Rejected {
                    status: 401,
                    message,
                })
            }
            401 => {
                warn!(%label, "Unauthorized");
                // A reply to a previous session must not end a newer one
                let current = self.session.current();
                let same = match (&sent_with, &current) {
                    (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                    (None, None) => true,
                    _ => false,
                };
                if same {
                    self.session.invalidate();
                }
                Err(ApiError::Unauthorized)
            }
            404 => {
                debug!(%label, "Not found");
                Err(ApiError::NotFound(response.detail().unwrap_or(label)))
            }
            status => {
                let message = response.failure_message();
                warn!(%label, status, %message, "Request rejected");
                Err(ApiError::Rejected { status, message })
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.fetch_with(request, Credential::Current).await
    }

    async fn fetch_with<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        credential: Credential,
    ) -> Result<T, ApiError> {
        let body = self.call(request, credential).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn with_json<T: serde::Serialize>(
        request: ApiRequest,
        payload: &T,
    ) -> Result<ApiRequest, ApiError> {
        request
            .json(payload)
            .map_err(|e| ApiError::Invalid(e.to_string()))
    }

    // --- Menu ---

    #[instrument(skip(self))]
    pub async fn fetch_menu(&self) -> Result<Vec<MenuItem>, ApiError> {
        let items: Vec<MenuItem> = self.fetch(ApiRequest::get("/menu/")).await?;
        debug!(count = items.len(), "Menu fetched");
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn create_menu_item(&self, item: &MenuItemCreate) -> Result<MenuItem, ApiError> {
        item.validate().map_err(ApiError::Invalid)?;
        let request = Self::with_json(ApiRequest::post("/menu/"), item)?;
        let created: MenuItem = self.fetch(request).await?;
        info!(id = %created.id, name = %created.name, "Menu item created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update_menu_item(
        &self,
        id: MenuItemId,
        update: &MenuItemUpdate,
    ) -> Result<MenuItem, ApiError> {
        update.validate().map_err(ApiError::Invalid)?;
        let request = Self::with_json(ApiRequest::put(format!("/menu/{}", id.0)), update)?;
        let updated: MenuItem = self.fetch(request).await?;
        info!(%id, "Menu item updated");
        Ok(updated)
    }

    pub async fn set_availability(
        &self,
        id: MenuItemId,
        is_available: bool,
    ) -> Result<MenuItem, ApiError> {
        self.update_menu_item(id, &MenuItemUpdate::availability(is_available))
            .await
    }

    // --- Orders ---

    #[instrument(skip(self))]
    pub async fn create_order(&self, order: &OrderCreate) -> Result<Order, ApiError> {
        if order.items.is_empty() {
            return Err(ApiError::Invalid("Order has no items".to_string()));
        }
        let request = Self::with_json(ApiRequest::post("/orders/"), order)?;
        let created: Order = self.fetch(request).await?;
        info!(id = %created.id, token = %created.display_token(), "Order placed");
        Ok(created)
    }

    /// Orders visible to the signed-in user (own orders, or the vendor's queue).
    #[instrument(skip(self))]
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError> {
        let orders: Vec<Order> = self.fetch(ApiRequest::get("/orders/")).await?;
        debug!(count = orders.len(), "Orders fetched");
        Ok(orders)
    }

    /// Like [`fetch_orders`](Self::fetch_orders), but only while `session` is
    /// still the current one. Returns [`ApiError::SessionChanged`] without sending
    /// anything once it has been torn down or replaced.
    #[instrument(skip_all)]
    pub async fn fetch_orders_as(&self, session: &Arc<Session>) -> Result<Vec<Order>, ApiError> {
        let request = ApiRequest::get("/orders/");
        let orders: Vec<Order> = self
            .fetch_with(request, Credential::Pinned(Arc::clone(session)))
            .await?;
        debug!(count = orders.len(), "Orders fetched");
        Ok(orders)
    }

    /// Requests `status` for order `id`. Idempotent; the target rides in the query string.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let request =
            ApiRequest::put(format!("/orders/{}/status", id.0)).query("status", status.as_str());
        let updated: Order = self.fetch(request).await?;
        info!(%id, status = %updated.status, "Order status updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn fetch_order_by_token(&self, token: TokenNumber) -> Result<Order, ApiError> {
        self.fetch(ApiRequest::get(format!("/orders/token/{}", token.0)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn predict_pickup(&self, order: &OrderCreate) -> Result<Prediction, ApiError> {
        let request = Self::with_json(ApiRequest::post("/predict/"), order)?;
        self.fetch(request).await
    }

    // --- Auth ---

    /// Exchanges credentials for a bearer token. The caller decides whether to
    /// publish the returned session.
    ///
    /// Sent without a bearer; a wrong password comes back as
    /// [`ApiError::Rejected`] and leaves any live session alone.
    #[instrument(skip(self))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = ApiRequest::post("/auth/token").form([
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        let grant: TokenGrant = self.fetch_with(request, Credential::Anonymous).await?;
        Ok(Session::new(
            grant.access_token,
            credentials.username.clone(),
            grant.role,
            grant.user_id,
        ))
    }

    #[instrument(skip(self))]
    pub async fn register(&self, registration: &Registration) -> Result<RegisteredUser, ApiError> {
        let request = Self::with_json(ApiRequest::post("/auth/register"), registration)?;
        let user: RegisteredUser = self.fetch_with(request, Credential::Anonymous).await?;
        info!(id = %user.id, role = %user.role, "Account registered");
        Ok(user)
    }
}
