use std::{collections::BTreeSet, sync::Arc};

use crate::membership::{
    ports::MembershipService,
    types::{Event, MEMBERSHIP_TOPIC, MembershipChangeEvent, site_id_from_principal},
};

/// Mirrors site group membership changes into the collaboration service.
///
/// Best effort and at most once per delivery: nothing is retried or
/// deduplicated, and every failure ends in a warning.
pub struct MembershipSyncHandler {
    service: Arc<dyn MembershipService>,
    topics: BTreeSet<String>,
}

impl MembershipSyncHandler {
    pub fn new(service: Arc<dyn MembershipService>) -> Self {
        Self::with_topics(service, [MEMBERSHIP_TOPIC])
    }

    pub fn with_topics<I, S>(service: Arc<dyn MembershipService>, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            service,
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }

    pub fn subscribes_to(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }

    #[tracing::instrument(
        name = "membership_handle",
        target = "membership",
        skip(self, event),
        fields(topic = %event.topic)
    )]
    pub async fn handle(&self, event: &Event) {
        if !self.subscribes_to(&event.topic) {
            return;
        }

        let change = MembershipChangeEvent::from_event(event);
        let Some(principal_name) = change.principal_name.as_deref() else {
            tracing::debug!(target: "membership", "membership_event_without_principal");
            return;
        };
        let Some(site_id) = site_id_from_principal(principal_name) else {
            tracing::debug!(
                target: "membership",
                principal_name = %principal_name,
                "membership_event_not_a_site_group"
            );
            return;
        };

        let user_id = match change.user_id() {
            Ok(user_id) => user_id,
            Err(err) => {
                tracing::warn!(
                    target: "membership",
                    site_id = %site_id,
                    principal_name = %principal_name,
                    error = %err,
                    "membership_toggle_failed"
                );
                return;
            }
        };

        match self.service.toggle_membership(&site_id, user_id).await {
            Ok(()) => tracing::debug!(
                target: "membership",
                site_id = %site_id,
                user_id = %user_id,
                "membership_toggled"
            ),
            Err(err) => tracing::warn!(
                target: "membership",
                site_id = %site_id,
                user_id = %user_id,
                kind = ?err.kind,
                error = %err,
                "membership_toggle_failed"
            ),
        }
    }
}
