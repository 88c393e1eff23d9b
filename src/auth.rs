//! Authentication
//!
//! The dashboard is single-user; the provider only tracks who is signed in.

use std::rc::Rc;

use crate::db::{session, Database};
use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
}

impl User {
    pub fn display_name(&self) -> &str {
        &self.id
    }
}

pub trait AuthProvider {
    fn current_user(&self) -> DashboardResult<Option<User>>;
    fn sign_in(&self, name: &str) -> DashboardResult<User>;
    fn logout(&self) -> DashboardResult<()>;
}

/// Persists the signed-in user in the local database
pub struct LocalAuth {
    db: Rc<Database>,
}

impl LocalAuth {
    pub fn new(db: Rc<Database>) -> Self {
        Self { db }
    }
}

impl AuthProvider for LocalAuth {
    fn current_user(&self) -> DashboardResult<Option<User>> {
        let id = session::get_session_user(self.db.conn())?;
        Ok(id.map(|id| User { id }))
    }

    fn sign_in(&self, name: &str) -> DashboardResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashboardError::validation("Name cannot be empty"));
        }
        session::save_session(self.db.conn(), name)?;
        tracing::info!(user = name, "signed in");
        Ok(User { id: name.to_string() })
    }

    fn logout(&self) -> DashboardResult<()> {
        session::clear_session(self.db.conn())?;
        tracing::info!("signed out");
        Ok(())
    }
}
