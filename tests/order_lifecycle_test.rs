use canteen_rush::config::ClientConfig;
use canteen_rush::model::{OrderId, OrderStatus, Role, TokenNumber, UserId};
use canteen_rush::orders::{LifecycleError, StatusAction};
use canteen_rush::runtime::CanteenApp;
use canteen_rush::session::{MemoryStorage, Route, Session};
use canteen_rush::views::ViewError;
use canteen_transport::mock::MockTransport;
use canteen_transport::Method;
use serde_json::{json, Value};
use std::sync::Arc;

fn order_json(id: u64, status: &str, token: u32, price: f64) -> Value {
    json!({
        "id": id,
        "user_id": 2,
        "vendor_id": 1,
        "status": status,
        "total_price": price,
        "token_number": token,
        "created_at": "2024-05-01T12:30:00",
        "predicted_pickup_time": "2024-05-01T12:45:00",
        "items": []
    })
}

fn vendor_app(mock: &MockTransport) -> CanteenApp {
    let app = CanteenApp::with_parts(
        Arc::new(mock.clone()),
        Arc::new(MemoryStorage::new()),
        ClientConfig::default(),
    );
    app.session
        .login(Session::new("vendor-jwt", "huda", Role::Vendor, UserId(1)))
        .expect("Failed to store session");
    app
}

/// Order #42: ordered → preparing → ready succeed, ready → preparing never leaves the client.
#[tokio::test]
async fn test_order_42_forward_path_and_backward_rejection() {
    let mock = MockTransport::new();
    mock.expect_get("/orders/").return_ok(json!([order_json(42, "ordered", 1234, 9.0)]));
    mock.expect_put("/orders/42/status").return_ok(order_json(42, "preparing", 1234, 9.0));
    mock.expect_get("/orders/").return_ok(json!([order_json(42, "preparing", 1234, 9.0)]));
    mock.expect_put("/orders/42/status").return_ok(order_json(42, "ready", 1234, 9.0));
    mock.expect_get("/orders/").return_ok(json!([order_json(42, "ready", 1234, 9.0)]));

    let app = vendor_app(&mock);
    let console = app.vendor();
    console.refresh().await.unwrap();

    let order = console
        .advance(OrderId(42), StatusAction::StartPreparing)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);

    let order = console
        .advance(OrderId(42), StatusAction::MarkReady)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Ready);

    // The refetch after each transition is what the board shows
    let board = console.orders().await.unwrap();
    assert_eq!(board.find(OrderId(42)).unwrap().status, OrderStatus::Ready);

    let sent_before = mock.request_count();
    let err = console
        .advance(OrderId(42), StatusAction::StartPreparing)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ViewError::Lifecycle(LifecycleError::InvalidTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::Preparing
        })
    ));
    assert_eq!(mock.request_count(), sent_before, "No request may be sent");

    let statuses: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Put)
        .map(|r| r.query)
        .collect();
    assert_eq!(
        statuses,
        vec![
            vec![("status".to_string(), "preparing".to_string())],
            vec![("status".to_string(), "ready".to_string())],
        ]
    );
    mock.verify();
}

#[tokio::test]
async fn test_failed_transition_leaves_board_unchanged() {
    let mock = MockTransport::new();
    mock.expect_get("/orders/").return_ok(json!([order_json(5, "ordered", 77, 3.0)]));
    mock.expect_put("/orders/5/status")
        .return_json(400, json!({"detail": "Order already cancelled"}));

    let app = vendor_app(&mock);
    let console = app.vendor();
    console.refresh().await.unwrap();

    let err = console
        .advance(OrderId(5), StatusAction::MarkReady)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Order already cancelled");

    let board = console.orders().await.unwrap();
    assert_eq!(board.find(OrderId(5)).unwrap().status, OrderStatus::Ordered);
    // No refetch and no retry
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_pickup_by_token_and_qr() {
    let mock = MockTransport::new();
    mock.expect_get("/orders/token/1234").return_ok(order_json(42, "ready", 1234, 9.0));
    mock.expect_get("/orders/token/1234").return_ok(order_json(42, "ready", 1234, 9.0));
    mock.expect_put("/orders/42/status").return_ok(order_json(42, "completed", 1234, 9.0));
    mock.expect_get("/orders/").return_ok(json!([order_json(42, "completed", 1234, 9.0)]));
    mock.expect_get("/orders/token/555")
        .return_json(404, json!({"detail": "Order not found"}));

    let app = vendor_app(&mock);
    let console = app.vendor();

    let scanned = console.scan_qr(r#"{"id": 42, "token": 1234}"#).await.unwrap();
    assert_eq!(scanned.id, OrderId(42));

    let handed_over = console.complete_pickup(TokenNumber(1234)).await.unwrap();
    assert_eq!(handed_over.status, OrderStatus::Completed);

    let err = console.lookup_token(TokenNumber(555)).await.unwrap_err();
    assert_eq!(err.user_message(), "Not found");

    assert!(matches!(
        console.scan_qr("not a pickup code").await,
        Err(ViewError::InvalidCode(_))
    ));
    mock.verify();
}

#[tokio::test]
async fn test_pickup_refused_unless_ready() {
    let mock = MockTransport::new();
    mock.expect_get("/orders/token/1234").return_ok(order_json(42, "preparing", 1234, 9.0));

    let app = vendor_app(&mock);
    let err = app
        .vendor()
        .complete_pickup(TokenNumber(1234))
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::Lifecycle(_)));
    assert_eq!(mock.count(Method::Put, "/orders/42/status"), 0);
}

#[tokio::test]
async fn test_console_stats_and_ordering() {
    let mock = MockTransport::new();
    mock.expect_get("/orders/").return_ok(json!([
        order_json(1, "completed", 11, 4.0),
        order_json(4, "ordered", 14, 2.5),
        order_json(2, "cancelled", 12, 8.0),
        order_json(3, "preparing", 13, 3.5)
    ]));
    mock.expect_get("/menu/").return_ok(json!([]));

    let app = vendor_app(&mock);
    let mut console = app.vendor();
    let board = console.open().await.unwrap();
    assert!(console.is_polling());

    let ids: Vec<u64> = board.orders.iter().map(|o| o.id.0).collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);

    let stats = console.stats().await.unwrap();
    assert_eq!(stats.total_orders, 4);
    assert_eq!(stats.active_orders, 2);
    assert_eq!(stats.revenue, 10.0);

    console.close().await;
}

#[tokio::test]
async fn test_console_requires_vendor_role() {
    let mock = MockTransport::new();
    let app = CanteenApp::with_parts(
        Arc::new(mock.clone()),
        Arc::new(MemoryStorage::new()),
        ClientConfig::default(),
    );
    app.session
        .login(Session::new("jwt", "ali", Role::Student, UserId(2)))
        .unwrap();

    let mut console = app.vendor();
    assert!(matches!(console.open().await, Err(ViewError::VendorOnly)));
    assert_eq!(app.session.route(), Route::Login);
    assert_eq!(mock.request_count(), 0);
}
