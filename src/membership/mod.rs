pub mod error;
pub mod handler;
pub mod http;
pub mod ingress;
pub mod noop;
pub mod ports;
pub mod types;
pub mod worker;

pub use error::{ServiceError, ServiceErrorKind};
pub use handler::MembershipSyncHandler;
pub use http::HttpMembershipService;
pub use ingress::{EventIngress, IngressError, IngressErrorKind};
pub use noop::NoopMembershipService;
pub use ports::MembershipService;
pub use types::{
    Event, MEMBERSHIP_TOPIC, MembershipChangeEvent, SiteId, UserRef, site_id_from_principal,
};
pub use worker::MembershipSyncWorker;
