//! Persistence adapters.
//!
//! Two backends stand behind the service: the remote relational store for
//! registered users, and the guest-local blob store for the guest identity.
//! The guest path bypasses the remote adapter entirely - it has no network
//! failure modes, only local I/O.

/// Guest-local single-blob store with demo seed data
pub mod guest;
/// Remote relational store adapter
pub mod remote;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::session::SessionContext;
pub use guest::GuestStore;
pub use remote::RemoteStore;

/// The persistence backend selected for one session.
#[derive(Debug)]
pub enum Backend {
    /// Remote relational store, scoped by owner id
    Remote(RemoteStore),
    /// Local blob store for the guest identity
    Guest(GuestStore),
}

impl Backend {
    /// Selects and connects the backend matching the session's owner.
    pub async fn for_session(session: &SessionContext, config: &AppConfig) -> Result<Self> {
        if session.is_guest() {
            Ok(Self::Guest(GuestStore::new(&config.guest_data_path)))
        } else {
            Ok(Self::Remote(RemoteStore::connect(&config.database_url).await?))
        }
    }
}
