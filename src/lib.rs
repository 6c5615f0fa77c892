pub mod booking;
pub mod config;
pub mod controllers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;

use std::sync::Arc;

// Shared state для всего приложения
pub struct AppState {
    pub sessions: session::SessionStore,
    pub backend: services::backend::BackendClient,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let backend = services::backend::BackendClient::from_config(&config.backend);
        let sessions = session::SessionStore::new(config.booking.clone());

        Arc::new(Self {
            sessions,
            backend,
            config,
        })
    }
}
