use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use blog_api_rust::database::DatabaseManager;
use blog_api_rust::handlers::{current, public};
use blog_api_rust::middleware::token_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = blog_api_rust::config::config();
    tracing_subscriber::fmt::init();
    tracing::info!("Starting blog API in {:?} mode", config.environment);

    // Migrations are best-effort at boot: without a reachable database the
    // server still serves the health check, and data endpoints report 503
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("could not run migrations at startup: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("BLOG_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("blog API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let mut router = Router::new()
        // Public
        .route("/api/v1/health_check", get(public::health::health_check))
        .merge(public_article_routes())
        .merge(auth_routes())
        // Authenticated, owner-scoped
        .merge(current_routes());

    let config = blog_api_rust::config::config();
    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn public_article_routes() -> Router {
    use public::articles;

    Router::new()
        .route("/api/v1/articles", get(articles::index))
        .route("/api/v1/articles/:id", get(articles::show))
}

fn auth_routes() -> Router {
    // Sign-up and sign-in acquire tokens; sign-out and validate_token
    // require one
    let open = Router::new()
        .route("/api/v1/auth", post(public::auth::sign_up))
        .route("/api/v1/auth/sign_in", post(public::auth::sign_in));

    let protected = Router::new()
        .route("/api/v1/auth/sign_out", delete(current::auth::sign_out))
        .route("/api/v1/auth/validate_token", get(current::auth::validate_token))
        .layer(axum::middleware::from_fn(token_auth_middleware));

    open.merge(protected)
}

fn current_routes() -> Router {
    use current::{articles, user};

    Router::new()
        .route("/api/v1/current/user", get(user::show))
        .route(
            "/api/v1/current/articles",
            get(articles::index).post(articles::create),
        )
        .route(
            "/api/v1/current/articles/:id",
            get(articles::show).patch(articles::update).put(articles::update),
        )
        .layer(axum::middleware::from_fn(token_auth_middleware))
}
