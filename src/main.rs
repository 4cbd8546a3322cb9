use canteen_rush::board::BoardSnapshot;
use canteen_rush::config::ClientConfig;
use canteen_rush::model::{
    Credentials, MenuItemCreate, MenuItemId, Order, OrderId, Registration, Role, TokenNumber,
};
use canteen_rush::orders::{available_actions, StatusAction};
use canteen_rush::runtime::CanteenApp;
use canteen_rush::views::{Notice, ViewError};
use canteen_transport::tracing::setup_tracing;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "canteen", author, version, about = "Campus food pre-ordering client")]
struct Args {
    /// Backend base URL (overrides CANTEEN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long, env = "CANTEEN_PASSWORD")]
        password: String,
        #[arg(long, default_value = "student")]
        role: Role,
    },
    /// Sign in and remember the session
    Login {
        username: String,
        #[arg(long, env = "CANTEEN_PASSWORD")]
        password: String,
    },
    Logout,
    /// List the menu
    Menu {
        #[arg(long)]
        search: Option<String>,
    },
    /// Place an order; repeat an item id to order several units
    Order {
        #[arg(required = true)]
        items: Vec<u64>,
        /// Only show the predicted wait
        #[arg(long)]
        predict: bool,
    },
    /// Show current orders once
    Orders,
    /// Keep refreshing orders until interrupted
    Watch,
    /// Move an order forward (start-prep, mark-ready, complete)
    Advance { order_id: u64, action: StatusAction },
    /// Find an order by pickup token
    Lookup { token: TokenNumber },
    /// Look up the token in a scanned QR payload
    Scan { payload: String },
    /// Verify a pickup token and hand the order over
    Complete { token: TokenNumber },
    /// Add a menu item
    AddItem {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 10)]
        prep: u32,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Toggle a menu item's availability
    Toggle { item_id: u64 },
    /// Vendor queue statistics
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_tracing();
    let args = Args::parse();

    match start(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn start(args: Args) -> Result<(), String> {
    let mut config = ClientConfig::load().map_err(|e| e.to_string())?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    let app = CanteenApp::new(config).map_err(|e| e.to_string())?;

    let outcome = run(&app, args.command).await;
    app.shutdown().await?;
    report(outcome)
}

/// A failed command becomes its notice text and a failing exit status.
fn report(outcome: Result<(), ViewError>) -> Result<(), String> {
    outcome.map_err(|e| e.notice().to_string())
}

async fn run(app: &CanteenApp, command: Command) -> Result<(), ViewError> {
    match command {
        Command::Register {
            username,
            email,
            password,
            role,
        } => {
            let user = app
                .register(&Registration {
                    username,
                    email,
                    password,
                    role,
                })
                .await?;
            println!("Registered {} ({}) as {}", user.username, user.email, user.role);
        }
        Command::Login { username, password } => {
            let route = app.login(&Credentials { username, password }).await?;
            println!("Signed in, continue at {route}");
        }
        Command::Logout => {
            app.logout();
            println!("Signed out");
        }
        Command::Menu { search } => {
            let mut view = app.student();
            view.load_menu().await?;
            for item in view.search(search.as_deref().unwrap_or_default()) {
                let availability = if item.is_available { "" } else { " (unavailable)" };
                println!(
                    "{:>4}  {:<28} {:>7.2}  {:>3} min  {}{}",
                    item.id.0,
                    item.name,
                    item.price,
                    item.prep_time_estimate,
                    item.vendor_name.as_deref().unwrap_or("-"),
                    availability
                );
            }
        }
        Command::Order { items, predict } => {
            let mut view = app.student();
            view.load_menu().await?;
            for id in items {
                view.add_to_cart(MenuItemId(id))?;
            }
            println!("Cart total: {:.2}", view.cart().total());
            if predict {
                let prediction = view.predict().await?;
                println!("Estimated wait: {} min", prediction.predicted_minutes);
            } else {
                let order = view.place_order().await?;
                println!("{}", Notice::order_placed(&order));
                print_ticket(&order);
            }
        }
        Command::Orders => {
            let snapshot = if is_vendor(app) {
                app.vendor().refresh().await?
            } else {
                app.student().track().await?
            };
            print_orders(&snapshot);
        }
        Command::Watch => watch(app).await?,
        Command::Advance { order_id, action } => {
            let console = app.vendor();
            console.refresh().await?;
            let order = console.advance(OrderId(order_id), action).await?;
            println!("Order {} is now {}", order.id, order.status);
        }
        Command::Lookup { token } => {
            let order = app.vendor().lookup_token(token).await?;
            print_order(&order);
        }
        Command::Scan { payload } => {
            let order = app.vendor().scan_qr(&payload).await?;
            print_order(&order);
        }
        Command::Complete { token } => {
            let order = app.vendor().complete_pickup(token).await?;
            println!("Order {} handed over", order.id);
        }
        Command::AddItem {
            name,
            price,
            prep,
            description,
            image_url,
        } => {
            let item = app
                .vendor()
                .create_menu_item(&MenuItemCreate {
                    name,
                    price,
                    description,
                    prep_time_estimate: prep,
                    image_url,
                })
                .await?;
            println!("Added {} ({})", item.name, item.id);
        }
        Command::Toggle { item_id } => {
            let mut console = app.vendor();
            console.reload_menu().await?;
            let item = console.toggle_availability(MenuItemId(item_id)).await?;
            let state = if item.is_available { "available" } else { "unavailable" };
            println!("{} is now {state}", item.name);
        }
        Command::Stats => {
            let console = app.vendor();
            console.refresh().await?;
            let stats = console.stats().await?;
            println!(
                "Total orders: {}  Active queue: {}  Revenue: {:.2}",
                stats.total_orders, stats.active_orders, stats.revenue
            );
        }
    }
    Ok(())
}

fn is_vendor(app: &CanteenApp) -> bool {
    app.session
        .current()
        .is_some_and(|s| s.role == Role::Vendor)
}

/// Prints the board on every applied refresh until Ctrl-C or the session ends.
async fn watch(app: &CanteenApp) -> Result<(), ViewError> {
    let mut updates = app.board.updates();
    let mut session = app.session.subscribe();

    let (first, mut vendor, mut student) = if is_vendor(app) {
        let mut console = app.vendor();
        let snapshot = console.open().await?;
        (snapshot, Some(console), None)
    } else {
        let mut view = app.student();
        let snapshot = view.track().await?;
        (snapshot, None, Some(view))
    };
    print_orders(&first);
    let _ = updates.borrow_and_update();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = session.changed() => {
                if changed.is_err() || session.borrow_and_update().is_none() {
                    println!("Session ended");
                    break;
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print_orders(&app.board.snapshot().await?);
            }
        }
    }

    if let Some(console) = vendor.take() {
        console.close().await;
    }
    if let Some(view) = student.take() {
        view.close().await;
    }
    info!("Watch finished");
    Ok(())
}

fn print_orders(snapshot: &BoardSnapshot) {
    if snapshot.is_empty() {
        println!("No orders");
        return;
    }
    for order in &snapshot.orders {
        print_order(order);
    }
    let stats = snapshot.stats();
    println!(
        "-- {} orders, {} in queue, revenue {:.2}",
        stats.total_orders, stats.active_orders, stats.revenue
    );
}

fn print_order(order: &Order) {
    let actions: Vec<String> = available_actions(order.status)
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "{:<6} token {:<6} {:<10} {:>7.2}  pickup {}  {}",
        order.id.to_string(),
        order.display_token(),
        order.status.to_string(),
        order.total_price,
        order.predicted_pickup_time.format("%H:%M"),
        actions.join(" ")
    );
}

fn print_ticket(order: &Order) {
    println!("Pickup token: {}", order.display_token());
    if let Some(code) = order.pickup_code() {
        println!("QR payload: {}", code.encode());
    }
}
