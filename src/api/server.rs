use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::env;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::handlers::{leagues, matches, standings, teams};
use crate::db;

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_target(false)
                .with_span_events(fmt::format::FmtSpan::CLOSE),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn,tower=warn")),
        )
        .init();
}

/// Build the router over an existing pool. Tests use this directly.
pub fn build_router(pool: PgPool) -> Router {
    Router::new()
        // Leagues
        .route(
            "/leagues",
            post(leagues::create_league).get(leagues::list_leagues),
        )
        .route(
            "/leagues/{league_id}",
            get(leagues::get_league)
                .put(leagues::update_league)
                .delete(leagues::delete_league),
        )
        // Membership
        .route("/leagues/{league_id}/teams", post(leagues::join_league))
        .route(
            "/leagues/{league_id}/teams/{team_id}",
            delete(leagues::leave_league),
        )
        // Teams
        .route("/teams", post(teams::create_team).get(teams::list_teams))
        .route(
            "/teams/{team_id}",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        // Matches - the three mutating routes drive the standings ledger
        .route(
            "/leagues/{league_id}/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            "/leagues/{league_id}/matches/{match_id}",
            get(matches::get_match)
                .put(matches::update_match)
                .delete(matches::delete_match),
        )
        // Standings
        .route(
            "/leagues/{league_id}/standings",
            get(standings::league_standings),
        )
        // Health check endpoint
        .route("/health", get(health_check))
        .with_state(pool)
        .layer(TraceLayer::new_for_http())
}

pub async fn create_app() -> Result<Router, Box<dyn std::error::Error>> {
    let pool = db::create_pool().await?;

    // Wait out a database that is still coming up
    db::with_retry(5, || db::health_check(&pool)).await?;

    Ok(build_router(pool))
}

async fn health_check() -> &'static str {
    "OK"
}

pub async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting league scorer server");

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
        info!("Shutting down gracefully...");
    };

    let app = create_app().await?;

    let port = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
