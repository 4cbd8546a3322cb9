use canteen_rush::api::{ApiClient, ApiError};
use canteen_rush::config::ClientConfig;
use canteen_rush::model::{
    Credentials, MenuItemCreate, MenuItemId, MenuItemUpdate, OrderCreate, OrderId, OrderStatus,
    Registration, Role, TokenNumber, UserId, VendorId,
};
use canteen_rush::runtime::CanteenApp;
use canteen_rush::session::{FileStorage, MemoryStorage, Route, Session, SessionStore};
use canteen_rush::views::{Notice, NoticeLevel, ViewError};
use canteen_transport::mock::MockTransport;
use canteen_transport::{Method, RequestBody};
use serde_json::{json, Value};
use std::sync::Arc;

fn menu_json() -> Value {
    json!([
        {"id": 3, "name": "Spicy Chicken Burger", "price": 4.5, "description": "Hot",
         "prep_time_estimate": 10, "vendor_id": 1, "vendor_name": "Huda", "is_available": true},
        {"id": 7, "name": "Masala Dosa", "price": 3.0, "description": "Crispy",
         "prep_time_estimate": 12, "vendor_id": 1, "vendor_name": "Huda", "is_available": true},
        {"id": 9, "name": "Cold Coffee", "price": 2.0, "description": "",
         "prep_time_estimate": 3, "vendor_id": 2, "vendor_name": "Brew", "is_available": false}
    ])
}

fn order_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": 2,
        "vendor_id": 1,
        "status": status,
        "total_price": 12.0,
        "token_number": 1234,
        "created_at": "2024-05-01T12:30:00.123456",
        "predicted_pickup_time": "2024-05-01T12:45:00",
        "items": [
            {"menu_item_id": 3, "quantity": 2},
            {"menu_item_id": 7, "quantity": 1}
        ]
    })
}

fn app_with(mock: &MockTransport, session: Option<Session>) -> CanteenApp {
    let app = CanteenApp::with_parts(
        Arc::new(mock.clone()),
        Arc::new(MemoryStorage::new()),
        ClientConfig::default(),
    );
    if let Some(session) = session {
        app.session.login(session).expect("Failed to store session");
    }
    app
}

fn student() -> Session {
    Session::new("student-jwt", "ali", Role::Student, UserId(2))
}

/// Full checkout: cart → order → tracked list.
#[tokio::test]
async fn test_student_checkout_flow() {
    let mock = MockTransport::new();
    mock.expect_get("/menu/").return_ok(menu_json());
    mock.expect_post("/orders/").return_ok(order_json(99, "ordered"));
    mock.expect_get("/orders/").return_ok(json!([order_json(99, "ordered")]));

    let app = app_with(&mock, Some(student()));
    let mut view = app.student();
    view.load_menu().await.expect("Failed to load menu");

    view.add_to_cart(MenuItemId(3)).unwrap();
    view.add_to_cart(MenuItemId(3)).unwrap();
    view.add_to_cart(MenuItemId(7)).unwrap();
    assert_eq!(view.cart().total(), 12.0);

    let order = view.place_order().await.expect("Failed to place order");
    assert_eq!(order.status, OrderStatus::Ordered);
    assert_eq!(order.token_number, Some(TokenNumber(1234)));
    assert!(view.cart().is_empty(), "Cart should be discarded after checkout");
    assert_eq!(
        Notice::order_placed(&order).message,
        "Order #99 placed successfully!"
    );

    let sent = mock
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Post)
        .unwrap();
    assert_eq!(sent.bearer.as_deref(), Some("student-jwt"));
    assert_eq!(
        sent.body,
        RequestBody::Json(json!({"items": [3, 3, 7], "vendor_id": 1}))
    );

    let tracked = view.track().await.expect("Failed to track orders");
    assert_eq!(
        tracked.orders.iter().filter(|o| o.id == OrderId(99)).count(),
        1
    );
    assert!(view.is_tracking());

    view.close().await;
    mock.verify();
    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_checkout_keeps_cart() {
    let mock = MockTransport::new();
    mock.expect_get("/menu/").return_ok(menu_json());
    mock.expect_post("/orders/")
        .return_json(400, json!({"detail": "Vendor is not accepting orders"}));

    let app = app_with(&mock, Some(student()));
    let mut view = app.student();
    view.load_menu().await.unwrap();
    view.add_to_cart(MenuItemId(7)).unwrap();

    let err = view.place_order().await.unwrap_err();
    let notice = err.notice();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Vendor is not accepting orders");
    assert_eq!(view.cart().units(), 1);
}

#[tokio::test]
async fn test_cart_rules_enforced_before_sending() {
    let mock = MockTransport::new();
    mock.expect_get("/menu/").return_ok(menu_json());

    let app = app_with(&mock, Some(student()));
    let mut view = app.student();
    view.load_menu().await.unwrap();

    assert!(matches!(view.place_order().await, Err(ViewError::Cart(_))));
    assert!(matches!(
        view.add_to_cart(MenuItemId(9)),
        Err(ViewError::Unavailable(_))
    ));
    assert!(matches!(
        view.add_to_cart(MenuItemId(404)),
        Err(ViewError::UnknownItem(_))
    ));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_checkout_without_session_redirects_to_login() {
    let mock = MockTransport::new();
    mock.expect_get("/menu/").return_ok(menu_json());

    let app = app_with(&mock, None);
    let mut view = app.student();
    view.load_menu().await.unwrap();
    view.add_to_cart(MenuItemId(3)).unwrap();

    assert!(matches!(
        view.place_order().await,
        Err(ViewError::LoginRequired)
    ));
    assert_eq!(app.session.route(), Route::Login);
    assert_eq!(view.cart().units(), 1);
}

#[tokio::test]
async fn test_login_and_register() {
    let mock = MockTransport::new();
    mock.expect_post("/auth/register").return_ok(json!({
        "id": 1, "username": "huda", "email": "huda@campus.edu", "role": "vendor"
    }));
    mock.expect_post("/auth/token").return_ok(json!({
        "access_token": "vendor-jwt", "token_type": "bearer", "role": "vendor", "user_id": 1
    }));

    let app = app_with(&mock, None);
    let user = app
        .register(&Registration {
            username: "huda".into(),
            email: "huda@campus.edu".into(),
            password: "pw".into(),
            role: Role::Vendor,
        })
        .await
        .unwrap();
    assert_eq!(user.role, Role::Vendor);

    let route = app
        .login(&Credentials {
            username: "huda".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
    assert_eq!(route, Route::Vendor);
    assert_eq!(app.session.token().as_deref(), Some("vendor-jwt"));
    mock.verify();
}

#[tokio::test]
async fn test_session_survives_restart() {
    let path = std::env::temp_dir().join(format!("canteen-it-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let first = SessionStore::restore(Arc::new(FileStorage::new(&path)));
    first.login(student()).unwrap();

    let second = SessionStore::restore(Arc::new(FileStorage::new(&path)));
    let restored = second.current().expect("Session should be restored");
    assert_eq!(restored.username, "ali");
    assert_eq!(restored.role, Role::Student);

    second.logout();
    assert!(SessionStore::restore(Arc::new(FileStorage::new(&path)))
        .current()
        .is_none());
}

fn signed_in_api(mock: &MockTransport) -> ApiClient {
    let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
    store.login(student()).unwrap();
    ApiClient::new(Arc::new(mock.clone()), store)
}

macro_rules! assert_teardown {
    ($method:expr, $path:expr, |$api:ident| $call:expr) => {{
        let mock = MockTransport::new();
        mock.expect($method, $path).return_status(401);
        let $api = signed_in_api(&mock);

        let result = $call.await;
        assert!(
            matches!(result, Err(ApiError::Unauthorized)),
            "{} {} should be unauthorized",
            $method,
            $path
        );
        assert!($api.session().current().is_none(), "{} {}", $method, $path);
        assert_eq!($api.session().route(), Route::Login);
        mock.verify();
    }};
}

/// Every authenticated endpoint ends the session on 401.
#[tokio::test]
async fn test_unauthorized_from_every_endpoint() {
    let order = OrderCreate {
        items: vec![MenuItemId(3)],
        vendor_id: VendorId(1),
    };
    let item = MenuItemCreate {
        name: "Tea".into(),
        price: 1.0,
        description: String::new(),
        prep_time_estimate: 2,
        image_url: None,
    };

    assert_teardown!(Method::Get, "/menu/", |api| api.fetch_menu());
    assert_teardown!(Method::Post, "/menu/", |api| api.create_menu_item(&item));
    assert_teardown!(Method::Put, "/menu/3", |api| api
        .update_menu_item(MenuItemId(3), &MenuItemUpdate::availability(false)));
    assert_teardown!(Method::Put, "/menu/3", |api| api.set_availability(MenuItemId(3), true));
    assert_teardown!(Method::Post, "/orders/", |api| api.create_order(&order));
    assert_teardown!(Method::Get, "/orders/", |api| api.fetch_orders());
    assert_teardown!(Method::Get, "/orders/", |api| api
        .fetch_orders_as(&api.session().current().unwrap()));
    assert_teardown!(Method::Put, "/orders/42/status", |api| api
        .update_order_status(OrderId(42), OrderStatus::Ready));
    assert_teardown!(Method::Get, "/orders/token/1234", |api| api
        .fetch_order_by_token(TokenNumber(1234)));
    assert_teardown!(Method::Post, "/predict/", |api| api.predict_pickup(&order));
}

/// Auth endpoints carry no bearer; a 401 there rejects the credentials only.
#[tokio::test]
async fn test_auth_rejection_keeps_live_session() {
    let mock = MockTransport::new();
    mock.expect_post("/auth/register")
        .return_json(401, json!({"detail": "Registration closed"}));
    mock.expect_post("/auth/token")
        .return_json(401, json!({"detail": "Incorrect username or password"}));
    let app = app_with(&mock, Some(student()));

    let err = app
        .register(&Registration {
            username: "x".into(),
            email: "x@campus.edu".into(),
            password: "pw".into(),
            role: Role::Student,
        })
        .await
        .unwrap_err();
    assert_eq!(err.notice().message, "Registration closed");

    let err = app
        .login(&Credentials {
            username: "ali".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.notice().message, "Incorrect username or password");

    assert!(mock.requests().iter().all(|r| r.bearer.is_none()));
    assert_eq!(app.session.token().as_deref(), Some("student-jwt"));
    assert_eq!(app.session.route(), Route::Menu);
    mock.verify();
}

#[tokio::test]
async fn test_teardown_empties_the_board() {
    let mock = MockTransport::new();
    mock.expect_get("/orders/").return_ok(json!([order_json(99, "ordered")]));
    mock.expect_get("/orders/").return_status(401);

    let app = app_with(&mock, Some(student()));
    let snapshot = app.student().track().await.unwrap();
    assert_eq!(snapshot.len(), 1);

    let mut updates = app.board.updates();
    let _ = updates.borrow_and_update();

    let err = app.api.fetch_orders().await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);

    updates.changed().await.unwrap();
    assert!(app.board.snapshot().await.unwrap().is_empty());
    assert_eq!(app.session.route(), Route::Login);
}
