use std::{collections::BTreeMap, fmt, iter, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::content::{Content, ContentManager, Repository};

pub const DEFAULT_RESOURCE_TYPE: &str = "sparse/content";

/// Opaque identity token handed over by the resolution framework.
pub trait CallerContext: Send + Sync {
    fn user_id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self(user_id.into())
    }
}

impl CallerContext for CallerIdentity {
    fn user_id(&self) -> &str {
        &self.0
    }
}

/// Raw inbound request data. The bridge never looks inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub method: String,
    pub uri: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Lets the framework resolve further paths as the same caller.
#[derive(Clone)]
pub struct ResolverContext {
    repository: Arc<dyn Repository>,
    user_id: String,
}

impl ResolverContext {
    pub fn new(repository: Arc<dyn Repository>, user_id: impl Into<String>) -> Self {
        Self {
            repository,
            user_id: user_id.into(),
        }
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }
}

impl CallerContext for ResolverContext {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl fmt::Debug for ResolverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverContext")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Wrapper returned to the resolution framework for a fetched entity.
#[derive(Clone)]
pub struct ResourceHandle {
    content: Content,
    content_manager: Arc<dyn ContentManager>,
    resolver_context: ResolverContext,
}

impl ResourceHandle {
    pub fn new(
        content: Content,
        content_manager: Arc<dyn ContentManager>,
        resolver_context: ResolverContext,
    ) -> Self {
        Self {
            content,
            content_manager,
            resolver_context,
        }
    }

    pub fn path(&self) -> &str {
        &self.content.path
    }

    pub fn resource_type(&self) -> &str {
        self.content.resource_type().unwrap_or(DEFAULT_RESOURCE_TYPE)
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn content_manager(&self) -> &Arc<dyn ContentManager> {
        &self.content_manager
    }

    pub fn resolver_context(&self) -> &ResolverContext {
        &self.resolver_context
    }

    pub fn into_content(self) -> Content {
        self.content
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("content", &self.content)
            .field("resolver_context", &self.resolver_context)
            .finish_non_exhaustive()
    }
}

/// Child traversal is not provided. This is always empty, finite and
/// restartable (`Clone`); it does not mean the entity has no children.
pub type Children = iter::Empty<ResourceHandle>;
