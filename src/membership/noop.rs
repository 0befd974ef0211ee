use async_trait::async_trait;

use crate::membership::{error::ServiceError, ports::MembershipService, types::SiteId};

/// Accepts every toggle and only records it in the log.
#[derive(Debug, Clone, Default)]
pub struct NoopMembershipService;

#[async_trait]
impl MembershipService for NoopMembershipService {
    async fn toggle_membership(
        &self,
        site_id: &SiteId,
        user_id: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            target: "membership.noop",
            site_id = %site_id,
            user_id = %user_id,
            "membership_toggle_skipped"
        );
        Ok(())
    }
}
