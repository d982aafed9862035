use actix_web::web;

use crate::config::auth::AuthMode;

pub mod auth;
pub mod games;
pub mod health;
pub mod players;

/// Configure application routes.
///
/// `main.rs` and the route tests register the same paths through this one
/// entry point so both exercise identical wiring. The identity routes and
/// the per-player history route swap in and out with the auth mode.
pub fn configure(cfg: &mut web::ServiceConfig, auth_mode: AuthMode) {
    // Health check: /api/health
    cfg.service(web::scope("/api/health").configure(health::configure_routes));

    // Identity flow: /auth/** (identity variant only)
    if auth_mode == AuthMode::Google {
        cfg.service(web::scope("/auth").configure(auth::configure_routes));
    }

    // Game records: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));

    // Player aggregates: /api/players/**
    cfg.service(
        web::scope("/api/players").configure(|c| players::configure_routes(c, auth_mode)),
    );
}
