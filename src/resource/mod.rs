pub mod ports;
pub mod provider;
pub mod types;

pub use ports::ResourceProvider;
pub use provider::{DEFAULT_ROOT, SparseResourceProvider};
pub use types::{
    CallerContext, CallerIdentity, Children, DEFAULT_RESOURCE_TYPE, ResolutionRequest,
    ResolverContext, ResourceHandle,
};
