pub mod error;
pub mod memory;
pub mod ports;
pub mod types;

pub use error::{StoreError, StoreErrorKind};
pub use memory::{InMemoryRepository, SeedEntry, SeedFile, SessionStats};
pub use ports::{ContentManager, Repository, Session};
pub use types::{Content, RESOURCE_TYPE_PROPERTY};
