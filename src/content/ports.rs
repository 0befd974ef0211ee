use std::sync::Arc;

use crate::content::{error::StoreError, types::Content};

/// Identity/session provider for the content store.
pub trait Repository: Send + Sync {
    /// Opens a session with elevated rights, impersonating `user_id`.
    fn login_administrative(&self, user_id: &str) -> Result<Box<dyn Session>, StoreError>;
}

/// A session scoped to one impersonated identity. `logout` consumes the
/// session, so a session can be released at most once.
pub trait Session: Send {
    fn user_id(&self) -> &str;

    fn content_manager(&self) -> Result<Arc<dyn ContentManager>, StoreError>;

    fn logout(self: Box<Self>) -> Result<(), StoreError>;
}

pub trait ContentManager: Send + Sync {
    fn get(&self, path: &str) -> Result<Option<Content>, StoreError>;
}
