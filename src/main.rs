use crate::auth::{StaffAuth, StaffAuthConfig};
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::responses::html_error_response;
use crate::router::{handle, App};
use astra::Server;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod forms;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "brokerage_site=info".into()),
        )
        .init();

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let db = Database::new(cfg.database_path.clone());
    if let Err(e) = init_db(&db, &cfg.schema_path) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    if cfg.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set; the admin console is disabled");
    }

    let app = App {
        db,
        staff: StaffAuth::new(StaffAuthConfig {
            admin_token: cfg.admin_token.clone(),
            session_ttl_secs: cfg.session_ttl_secs,
        }),
    };

    tracing::info!(addr = %cfg.bind_addr, workers = cfg.max_workers, "starting server");

    let server = Server::bind(&cfg.bind_addr).max_workers(cfg.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => html_error_response(err),
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down cleanly");
}
