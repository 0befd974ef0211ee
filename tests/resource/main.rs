mod children;
mod lifecycle;

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use sparse_bridge::content::{
    Content, ContentManager, Repository, Session, StoreError,
    error::{access_denied, authentication, session_release, storage},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Authentication,
    Storage,
    AccessDenied,
}

/// Repository double that records every store interaction in order.
#[derive(Default)]
pub struct ScriptedRepository {
    contents: BTreeMap<String, Content>,
    login_failure: bool,
    get_failure: Option<Failure>,
    logout_failure: bool,
    journal: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRepository {
    pub fn with_content(mut self, content: Content) -> Self {
        self.contents.insert(content.path.clone(), content);
        self
    }

    pub fn failing_login(mut self) -> Self {
        self.login_failure = true;
        self
    }

    pub fn failing_get(mut self, failure: Failure) -> Self {
        self.get_failure = Some(failure);
        self
    }

    pub fn failing_logout(mut self) -> Self {
        self.logout_failure = true;
        self
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().expect("lock").clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.journal()
            .iter()
            .filter(|entry| entry.starts_with(prefix))
            .count()
    }
}

impl Repository for ScriptedRepository {
    fn login_administrative(&self, user_id: &str) -> Result<Box<dyn Session>, StoreError> {
        self.journal
            .lock()
            .expect("lock")
            .push(format!("login:{user_id}"));
        if self.login_failure {
            return Err(authentication("client pool exhausted"));
        }

        Ok(Box::new(ScriptedSession {
            user_id: user_id.to_string(),
            manager: Arc::new(ScriptedContentManager {
                contents: self.contents.clone(),
                failure: self.get_failure,
                journal: Arc::clone(&self.journal),
            }),
            logout_failure: self.logout_failure,
            journal: Arc::clone(&self.journal),
        }))
    }
}

struct ScriptedSession {
    user_id: String,
    manager: Arc<ScriptedContentManager>,
    logout_failure: bool,
    journal: Arc<Mutex<Vec<String>>>,
}

impl Session for ScriptedSession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn content_manager(&self) -> Result<Arc<dyn ContentManager>, StoreError> {
        Ok(self.manager.clone())
    }

    fn logout(self: Box<Self>) -> Result<(), StoreError> {
        self.journal
            .lock()
            .expect("lock")
            .push(format!("logout:{}", self.user_id));
        if self.logout_failure {
            return Err(session_release("connection already returned to pool"));
        }
        Ok(())
    }
}

struct ScriptedContentManager {
    contents: BTreeMap<String, Content>,
    failure: Option<Failure>,
    journal: Arc<Mutex<Vec<String>>>,
}

impl ContentManager for ScriptedContentManager {
    fn get(&self, path: &str) -> Result<Option<Content>, StoreError> {
        self.journal.lock().expect("lock").push(format!("get:{path}"));
        match self.failure {
            Some(Failure::Storage) => Err(storage("row store unreachable")),
            Some(Failure::AccessDenied) => Err(access_denied(format!("no read on {path}"))),
            Some(Failure::Authentication) => Err(authentication("session expired")),
            None => Ok(self.contents.get(path).cloned()),
        }
    }
}
