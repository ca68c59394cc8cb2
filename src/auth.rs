//! Stand-in sign-in. Any non-empty email and password is accepted.

use std::time::Duration;
use tracing::{info, warn};

use crate::error::{AppraisalError, Result};
use crate::protocol::UserProfile;
use crate::store::{SectionStore, AUTH_SLOT, USER_SLOT};

pub const FACULTY_NAME: &str = "Dr. Shikha K Mehta";
pub const FACULTY_DEPARTMENT: &str = "Computer Science & Engineering";

#[derive(Clone)]
pub struct MockAuth {
    store: SectionStore,
    delay: Duration,
}

impl MockAuth {
    pub fn new(store: SectionStore, delay: Duration) -> Self {
        Self { store, delay }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        tokio::time::sleep(self.delay).await;

        if email.trim().is_empty() || password.is_empty() {
            warn!("Login rejected: missing email or password");
            return Err(AppraisalError::Auth(
                "Please enter email and password".to_string(),
            ));
        }

        let profile = UserProfile {
            name: FACULTY_NAME.to_string(),
            email: email.trim().to_string(),
            department: FACULTY_DEPARTMENT.to_string(),
        };
        self.store.write_json(AUTH_SLOT, &true)?;
        self.store.write_json(USER_SLOT, &profile)?;
        info!("Logged in as {}", profile.email);
        Ok(profile)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove_slot(AUTH_SLOT)?;
        self.store.remove_slot(USER_SLOT)?;
        info!("Logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.read_json::<bool>(AUTH_SLOT), Ok(Some(true)))
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        match self.store.read_json::<UserProfile>(USER_SLOT) {
            Ok(user) => user,
            Err(e) => {
                warn!("Failed to read user profile: {}", e);
                None
            }
        }
    }
}
