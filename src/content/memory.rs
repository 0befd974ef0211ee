use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
    sync::{Arc, RwLock},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{
    error::{StoreError, access_denied, authentication, storage},
    ports::{ContentManager, Repository, Session},
    types::Content,
};

/// One entry of a seed file. `readers` restricts reads to the listed user ids;
/// when omitted every authenticated user may read the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedEntry {
    #[serde(flatten)]
    pub content: Content,
    #[serde(default)]
    pub readers: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub entries: Vec<SeedEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub opened: u64,
    pub released: u64,
}

impl SessionStats {
    pub fn open_sessions(&self) -> u64 {
        self.opened.saturating_sub(self.released)
    }
}

struct StoredEntry {
    content: Content,
    readers: Option<BTreeSet<String>>,
}

struct StoreState {
    available: bool,
    entries: BTreeMap<String, StoredEntry>,
    stats: SessionStats,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            available: true,
            entries: BTreeMap::new(),
            stats: SessionStats::default(),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedFile) -> Self {
        let repository = Self::new();
        for entry in seed.entries {
            repository.insert_entry(entry.content, entry.readers);
        }
        repository
    }

    pub fn from_seed_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read content seed {}", path.display()))?;
        let seed: SeedFile = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse content seed {}", path.display()))?;
        Ok(Self::from_seed(seed))
    }

    pub fn insert(&self, content: Content) {
        self.insert_entry(content, None);
    }

    pub fn insert_restricted<I, S>(&self, content: Content, readers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let readers = readers.into_iter().map(Into::into).collect();
        self.insert_entry(content, Some(readers));
    }

    pub fn remove(&self, path: &str) -> Option<Content> {
        self.state
            .write()
            .expect("lock poisoned")
            .entries
            .remove(path)
            .map(|entry| entry.content)
    }

    pub fn len(&self) -> usize {
        self.state.read().expect("lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// While unavailable, every administrative login fails.
    pub fn set_available(&self, available: bool) {
        self.state.write().expect("lock poisoned").available = available;
    }

    pub fn session_stats(&self) -> SessionStats {
        self.state.read().expect("lock poisoned").stats
    }

    fn insert_entry(&self, content: Content, readers: Option<BTreeSet<String>>) {
        let mut guard = self.state.write().expect("lock poisoned");
        guard
            .entries
            .insert(content.path.clone(), StoredEntry { content, readers });
    }
}

impl Repository for InMemoryRepository {
    fn login_administrative(&self, user_id: &str) -> Result<Box<dyn Session>, StoreError> {
        if user_id.trim().is_empty() {
            return Err(authentication("cannot impersonate an empty user id"));
        }

        let mut guard = self.state.write().expect("lock poisoned");
        if !guard.available {
            return Err(authentication(format!(
                "content store unavailable; login for '{user_id}' refused"
            )));
        }
        guard.stats.opened = guard.stats.opened.saturating_add(1);

        Ok(Box::new(InMemorySession {
            session_id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct InMemorySession {
    session_id: Uuid,
    user_id: String,
    state: Arc<RwLock<StoreState>>,
}

impl Session for InMemorySession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn content_manager(&self) -> Result<Arc<dyn ContentManager>, StoreError> {
        Ok(Arc::new(InMemoryContentManager {
            user_id: self.user_id.clone(),
            state: Arc::clone(&self.state),
        }))
    }

    fn logout(self: Box<Self>) -> Result<(), StoreError> {
        let mut guard = self.state.write().expect("lock poisoned");
        guard.stats.released = guard.stats.released.saturating_add(1);
        tracing::trace!(
            target: "content.memory",
            session_id = %self.session_id,
            user_id = %self.user_id,
            "session_released"
        );
        Ok(())
    }
}

struct InMemoryContentManager {
    user_id: String,
    state: Arc<RwLock<StoreState>>,
}

impl ContentManager for InMemoryContentManager {
    fn get(&self, path: &str) -> Result<Option<Content>, StoreError> {
        if !path.starts_with('/') {
            return Err(storage(format!("content path must be absolute: '{path}'")));
        }

        let guard = self.state.read().expect("lock poisoned");
        let Some(entry) = guard.entries.get(path) else {
            return Ok(None);
        };

        if let Some(readers) = &entry.readers
            && !readers.contains(&self.user_id)
        {
            return Err(access_denied(format!(
                "user '{}' may not read '{}'",
                self.user_id, path
            )));
        }

        Ok(Some(entry.content.clone()))
    }
}
