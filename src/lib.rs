pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod session;

use anyhow::Result;

use crate::app::{Router, Screen};
use crate::config::Config;
use crate::models::User;
use crate::session::{Session, SessionStore};

/// Application shell state: configuration plus the single owner of the
/// session. Views read the session by reference; the only mutations are the
/// two entry points below, which keep memory and disk consistent.
pub struct AppState {
    pub config: Config,
    store: SessionStore,
    session: Option<Session>,
    router: Router,
}

impl AppState {
    /// Boot: attempt to restore a persisted session and route accordingly.
    pub fn boot(config: Config) -> Self {
        let store = SessionStore::new(&config.storage.data_dir);
        let session = store.restore();
        let router = Router::boot(session.as_ref());
        Self {
            config,
            store,
            session,
            router,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn screen(&self) -> Screen {
        self.router.screen()
    }

    /// Record a successful login: persist the session, then hold it.
    pub fn complete_login(&mut self, user: User, token: String) -> Result<()> {
        let session = Session { user, token };
        self.store.save(&session)?;
        self.session = Some(session);
        self.router.on_login();
        Ok(())
    }

    /// Drop the session, in memory and on disk, regardless of prior state.
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear()?;
        self.session = None;
        self.router.on_logout();
        Ok(())
    }
}
