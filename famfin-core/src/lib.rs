//! Famfin Core - client-side logic for a shared family finance tracker
//!
//! This crate follows a hexagonal architecture:
//!
//! - **domain**: Core entities (Session, Transaction, Family, etc.) and their validation
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Session lifecycle, navigation guard and feature services
//! - **adapters**: Concrete implementations (REST API client, JSON file storage)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod format;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::{ApiClient, FileKeyValueStore};
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{
    BearerToken, DashboardData, DashboardPeriod, Family, Session, SessionState, Transaction,
    TransactionDraft, TransactionFilter, TransactionType, UserProfile,
};

/// Main context for famfin operations
///
/// Holds the configuration, the session store and every service built on
/// top of it. All services share one `SessionStore`.
pub struct FamfinContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub session: Arc<SessionStore>,
    pub transaction_service: TransactionService,
    pub family_service: FamilyService,
    pub dashboard_service: DashboardService,
    pub account_service: AccountService,
    diagnostics: Diagnostics,
}

impl FamfinContext {
    /// Create a context persisting the session to `storage.json` in
    /// `data_dir`
    pub fn new(data_dir: &Path, diagnostics: Diagnostics) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let storage = Arc::new(
            FileKeyValueStore::in_dir(data_dir).with_diagnostics(diagnostics.clone()),
        );
        Self::with_store(data_dir, storage, diagnostics)
    }

    /// Create a context over any key-value store
    pub fn with_store(
        data_dir: &Path,
        storage: Arc<dyn KeyValueStore>,
        diagnostics: Diagnostics,
    ) -> Result<Self> {
        let config = Config::load(data_dir)?;
        for issue in &config.issues {
            diagnostics.event(LogEvent::new("config_invalid").with_error(issue.as_str()));
        }
        let api = ApiClient::new(&config.api_base_url, config.request_timeout)?;

        let session = Arc::new(SessionStore::new(storage, api).with_diagnostics(diagnostics.clone()));

        Ok(Self {
            transaction_service: TransactionService::new(Arc::clone(&session), diagnostics.clone()),
            family_service: FamilyService::new(Arc::clone(&session), diagnostics.clone()),
            dashboard_service: DashboardService::new(Arc::clone(&session), diagnostics.clone()),
            account_service: AccountService::new(Arc::clone(&session), diagnostics.clone()),
            config,
            data_dir: data_dir.to_path_buf(),
            session,
            diagnostics,
        })
    }

    /// Guard observing this context's session store
    pub fn navigation(&self) -> NavigationGuard {
        NavigationGuard::new(self.session.subscribe())
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
