use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use lehrsaldo::cli;
use lehrsaldo::config::server::ServerConfig;
use lehrsaldo::router::init_router;
use lehrsaldo::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "create-controller" {
        handle_create_controller(args).await;
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;

    if let Err(e) = cli::ensure_initial_controller(&state.db).await {
        tracing::error!("Failed to bootstrap initial controller: {}", e);
    }

    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(server_config.bind_addr())
        .await
        .unwrap();
    println!("Server running on http://localhost:{}", server_config.port);
    println!(
        "Swagger UI available at http://localhost:{}/swagger-ui",
        server_config.port
    );
    axum::serve(listener, app).await.unwrap();
}

async fn handle_create_controller(args: Vec<String>) {
    if args.len() != 6 {
        eprintln!(
            "Usage: {} create-controller <first_name> <last_name> <username> <password>",
            args[0]
        );
        std::process::exit(1);
    }

    let first_name = &args[2];
    let last_name = &args[3];
    let username = &args[4];
    let password = &args[5];

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    match cli::create_controller(&pool, first_name, last_name, username, password).await {
        Ok(_) => {
            println!("Controller created successfully");
            println!("   Username: {}", username);
            println!("   Name: {} {}", first_name, last_name);
        }
        Err(e) => {
            eprintln!("Error creating controller: {}", e);
            std::process::exit(1);
        }
    }
}
