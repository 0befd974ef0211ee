use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::membership::error::{ServiceError, unresolvable_user};

/// Topic the user manager publishes group membership changes on.
pub const MEMBERSHIP_TOPIC: &str = "org/apache/sling/jackrabbit/usermanager/event/part";
pub const PRINCIPAL_NAME_PROPERTY: &str = "principal_name";
pub const USER_PROPERTY: &str = "user";

const SITE_GROUP_PREFIX: &str = "g-";
const SITE_GROUP_SUFFIXES: [&str; 2] = ["-collaborators", "-viewers"];

/// Generic message carried by the event channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub topic: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Event {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Reference to the user whose membership changed. Directories hand this
/// over either as a bare id or as a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Record {
        #[serde(default)]
        id: Option<String>,
    },
}

impl UserRef {
    pub fn user_id(&self) -> Result<&str, ServiceError> {
        let id = match self {
            UserRef::Id(id) => Some(id.as_str()),
            UserRef::Record { id } => id.as_deref(),
        };

        id.map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| unresolvable_user("user reference carries no id"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChangeEvent {
    pub principal_name: Option<String>,
    pub user: Option<UserRef>,
}

impl MembershipChangeEvent {
    pub fn from_event(event: &Event) -> Self {
        let principal_name = event
            .properties
            .get(PRINCIPAL_NAME_PROPERTY)
            .and_then(Value::as_str)
            .map(str::to_string);
        let user = event
            .properties
            .get(USER_PROPERTY)
            .and_then(|value| UserRef::deserialize(value).ok());

        Self {
            principal_name,
            user,
        }
    }

    pub fn user_id(&self) -> Result<&str, ServiceError> {
        self.user
            .as_ref()
            .ok_or_else(|| unresolvable_user("membership event carries no user"))?
            .user_id()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(String);

impl SiteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `g-<site>-collaborators` and `g-<site>-viewers` name site groups; any
/// other principal, including one with an empty site, yields `None`.
pub fn site_id_from_principal(principal_name: &str) -> Option<SiteId> {
    let rest = principal_name.strip_prefix(SITE_GROUP_PREFIX)?;
    SITE_GROUP_SUFFIXES
        .iter()
        .find_map(|suffix| rest.strip_suffix(suffix))
        .filter(|site| !site.is_empty())
        .map(|site| SiteId(site.to_string()))
}
