//! Session context - who owns the data for the lifetime of one session.
//!
//! The owner identity is established once at application start (login or
//! guest entry) and passed explicitly into the service and store
//! constructors; nothing in the engine reads ambient global state. Logout
//! tears the context down together with the service built from it.

use serde::{Deserialize, Serialize};

/// Fixed sentinel identity for guest sessions.
///
/// Data for this owner never touches the remote store; it lives in the
/// guest-local blob store on the device.
pub const GUEST_OWNER_ID: &str = "local-guest-user";

/// The identity budget data is scoped to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerId {
    /// Local-only guest session, persisted on-device
    Guest,
    /// Registered user, persisted in the remote store
    User(String),
}

impl OwnerId {
    /// The identity string rows are scoped by.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Guest => GUEST_OWNER_ID,
            Self::User(id) => id,
        }
    }

    /// Whether this is the guest identity.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}

/// Explicit per-session context, created at application start and torn down
/// at logout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    owner: OwnerId,
}

impl SessionContext {
    /// Builds a context for the given owner.
    #[must_use]
    pub const fn new(owner: OwnerId) -> Self {
        Self { owner }
    }

    /// Builds a guest-mode context.
    #[must_use]
    pub const fn guest() -> Self {
        Self::new(OwnerId::Guest)
    }

    /// Builds a registered-user context.
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self::new(OwnerId::User(id.into()))
    }

    /// The session's owner identity.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Whether this session runs in guest mode.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.owner.is_guest()
    }
}
