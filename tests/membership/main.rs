mod ingress;
mod worker;

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde_json::json;
use sparse_bridge::membership::{
    Event, MEMBERSHIP_TOPIC, MembershipService, ServiceError, SiteId, error::transport,
};

/// Membership service double recording every toggle it receives.
#[derive(Default)]
pub struct RecordingService {
    toggles: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingService {
    pub fn failing() -> Self {
        Self {
            toggles: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn toggles(&self) -> Vec<(String, String)> {
        self.toggles.lock().expect("lock").clone()
    }
}

#[async_trait]
impl MembershipService for RecordingService {
    async fn toggle_membership(
        &self,
        site_id: &SiteId,
        user_id: &str,
    ) -> Result<(), ServiceError> {
        self.toggles
            .lock()
            .expect("lock")
            .push((site_id.to_string(), user_id.to_string()));
        if self.fail {
            return Err(transport("collaboration service unreachable"));
        }
        Ok(())
    }
}

/// Membership service double whose toggles never complete.
#[derive(Default)]
pub struct HangingService {
    started: AtomicUsize,
}

impl HangingService {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MembershipService for HangingService {
    async fn toggle_membership(
        &self,
        _site_id: &SiteId,
        _user_id: &str,
    ) -> Result<(), ServiceError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

pub fn membership_event(principal_name: &str, user_id: &str) -> Event {
    Event::new(MEMBERSHIP_TOPIC)
        .with_property("principal_name", principal_name)
        .with_property("user", json!({ "id": user_id }))
}

pub fn toggle(site: &str, user: &str) -> (String, String) {
    (site.to_string(), user.to_string())
}
