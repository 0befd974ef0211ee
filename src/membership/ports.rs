use async_trait::async_trait;

use crate::membership::{error::ServiceError, types::SiteId};

/// External collaboration service. It only offers a toggle: every call flips
/// the user's membership of the site, so a redelivered event undoes the
/// previous one.
#[async_trait]
pub trait MembershipService: Send + Sync {
    async fn toggle_membership(&self, site_id: &SiteId, user_id: &str)
    -> Result<(), ServiceError>;
}
