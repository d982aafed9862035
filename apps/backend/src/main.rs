use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use backend::auth::oauth::GoogleAuth;
use backend::config::auth::GoogleConfig;
use backend::config::db::DbProfile;
use backend::infra::db::bootstrap_db;
use backend::middleware::cors::cors_middleware;
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use backend::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    println!("🚀 Starting Golf Backend on http://{}:{}", host, port);

    let jwt = match std::env::var("BACKEND_JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("❌ BACKEND_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let security_config = SecurityConfig::new(jwt.as_bytes());

    let db = match bootstrap_db(DbProfile::Prod).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to initialize database: {e}");
            std::process::exit(1);
        }
    };

    println!("✅ Database connected");

    let mut app_state = AppState::new(db, security_config);

    match GoogleConfig::from_env() {
        Ok(Some(config)) => match GoogleAuth::discover(config).await {
            Ok(google) => {
                app_state = app_state.with_google(Arc::new(google));
                println!("🔐 Google sign-in enabled");
            }
            Err(e) => {
                eprintln!("❌ Google OAuth setup failed: {e}");
                std::process::exit(1);
            }
        },
        Ok(None) => {
            println!("🔓 Running without authentication");
        }
        Err(e) => {
            eprintln!("❌ Invalid auth configuration: {e}");
            std::process::exit(1);
        }
    }

    let auth_mode = app_state.auth_mode;

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .app_data(data.clone())
            .configure(|cfg| routes::configure(cfg, auth_mode))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
