use std::iter;

use crate::resource::types::{CallerContext, Children, ResolutionRequest, ResourceHandle};

/// Capability the resolution framework calls to turn a path into a resource.
pub trait ResourceProvider: Send + Sync {
    /// Mount points this provider answers for.
    fn roots(&self) -> &[String];

    fn resolve(&self, context: &dyn CallerContext, path: &str) -> Option<ResourceHandle>;

    fn resolve_request(
        &self,
        context: &dyn CallerContext,
        _request: &ResolutionRequest,
        path: &str,
    ) -> Option<ResourceHandle> {
        self.resolve(context, path)
    }

    fn list_children(&self, _parent: &ResourceHandle) -> Children {
        iter::empty()
    }
}
