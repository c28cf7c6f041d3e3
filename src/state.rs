// src/state.rs
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::rules::RuleError;
use crate::services::metrics_manager::MetricsManager;
use crate::services::responder::Responder;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub metrics: MetricsManager,
    pub admin_key: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, RuleError> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let metrics = MetricsManager::new();
        let sessions = SessionManager::new(
            Responder::with_default_rules()?,
            metrics.clone(),
            rng,
            config.reply_delay,
            config.session_ttl,
        );
        Ok(Self {
            sessions,
            metrics,
            admin_key: config.admin_key.clone(),
        })
    }
}
