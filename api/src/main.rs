use std::sync::Arc;

use axum::{Router, routing::get};
use dotenv::dotenv;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod comment;
mod config;
mod context;
mod db;
mod error;
mod graphql;
mod identity;
mod schema;

use config::{Env, ServerConfig};
use db::PgStore;
use graphql::CommentSchema;

#[derive(Clone)]
pub struct App {
    pub store: Arc<PgStore>,
    pub config: Arc<ServerConfig>,
    pub schema: CommentSchema,
}

fn init_tracing(env: Env) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Dev => registry.with(tracing_subscriber::fmt::layer()).init(),
        Env::Staging | Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    init_tracing(Env::from_env());

    let config = ServerConfig::new_from_env();
    let store = PgStore::connect(&config.database_url, config.database_max_connections)?;

    let mut router = Router::new()
        .route("/graphql", axum::routing::post(graphql::graphql_handler))
        .route("/health", get(|| async { "ok" }));

    if config.env == Env::Dev {
        router = router.route("/graphiql", get(graphql::graphiql));
    }

    let listen_addr = config.listen_addr.clone();
    let app = App {
        store: Arc::new(store),
        config: Arc::new(config),
        schema: graphql::build_schema(),
    };

    let router = router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);
    axum::serve(listener, router).await?;

    Ok(())
}
