use std::sync::Arc;

use crate::{
    content::{Repository, Session, StoreError},
    resource::{
        ports::ResourceProvider,
        types::{CallerContext, ResolverContext, ResourceHandle},
    },
};

pub const DEFAULT_ROOT: &str = "/test";

/// Resolves paths against the sparse content store, one administrative
/// session per call. Store failures never reach the caller; they are logged
/// and reported as an absent resource.
pub struct SparseResourceProvider {
    repository: Arc<dyn Repository>,
    roots: Vec<String>,
}

impl SparseResourceProvider {
    pub fn new(repository: Arc<dyn Repository>, roots: Vec<String>) -> Self {
        let roots = if roots.is_empty() {
            vec![DEFAULT_ROOT.to_string()]
        } else {
            roots
        };
        Self { repository, roots }
    }

    /// Runs `work` inside a session for `user_id`. Logout is attempted only
    /// when login succeeded, exactly once, and its failure is not reported.
    fn with_session<T>(
        &self,
        user_id: &str,
        work: impl FnOnce(&dyn Session) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let session = self.repository.login_administrative(user_id)?;
        let outcome = work(session.as_ref());

        if let Err(err) = session.logout() {
            tracing::debug!(
                target: "resource",
                user_id = %user_id,
                kind = ?err.kind,
                error = %err,
                "session_release_failed"
            );
        }

        outcome
    }
}

impl ResourceProvider for SparseResourceProvider {
    fn roots(&self) -> &[String] {
        &self.roots
    }

    #[tracing::instrument(
        name = "resource_resolve",
        target = "resource",
        skip(self, context),
        fields(user_id = %context.user_id())
    )]
    fn resolve(&self, context: &dyn CallerContext, path: &str) -> Option<ResourceHandle> {
        let user_id = context.user_id();
        let fetched = self.with_session(user_id, |session| {
            let content_manager = session.content_manager()?;
            let content = content_manager.get(path)?;
            Ok(content.map(|content| (content, content_manager)))
        });

        match fetched {
            Ok(Some((content, content_manager))) => Some(ResourceHandle::new(
                content,
                content_manager,
                ResolverContext::new(Arc::clone(&self.repository), user_id),
            )),
            Ok(None) => {
                tracing::debug!(target: "resource", path = %path, "resource_not_found");
                None
            }
            Err(err) => {
                tracing::error!(
                    target: "resource",
                    path = %path,
                    kind = ?err.kind,
                    error = %err,
                    "resource_resolve_failed"
                );
                None
            }
        }
    }
}
