use serde::{Deserialize, Serialize, de::Error as _};
use serde_json::{Map, Value};

use crate::{
    membership::Event,
    resource::{ResolutionRequest, ResourceHandle},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Resolve {
        user_id: String,
        path: String,
        request: Option<ResolutionRequest>,
    },
    Event(Event),
    Exit,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: WireMessageType,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    request: Option<ResolutionRequest>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WireMessageType {
    Resolve,
    Event,
    Exit,
}

pub fn parse_client_message(line: &str) -> Result<ClientMessage, serde_json::Error> {
    let wire: WireMessage = serde_json::from_str(line)?;
    let message = match wire.kind {
        WireMessageType::Resolve => ClientMessage::Resolve {
            user_id: wire
                .user_id
                .ok_or_else(|| serde_json::Error::missing_field("user_id"))?,
            path: wire
                .path
                .ok_or_else(|| serde_json::Error::missing_field("path"))?,
            request: wire.request,
        },
        WireMessageType::Event => ClientMessage::Event(Event {
            topic: wire
                .topic
                .ok_or_else(|| serde_json::Error::missing_field("topic"))?,
            properties: wire.properties.unwrap_or_default(),
        }),
        WireMessageType::Exit => ClientMessage::Exit,
    };
    Ok(message)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Resource {
        path: String,
        resource_type: String,
        properties: Map<String, Value>,
    },
    Absent {
        path: String,
    },
    Accepted,
    Rejected {
        reason: String,
    },
}

impl ServerMessage {
    pub fn from_resolution(path: &str, resolved: Option<ResourceHandle>) -> Self {
        match resolved {
            Some(handle) => {
                let resource_type = handle.resource_type().to_string();
                let content = handle.into_content();
                ServerMessage::Resource {
                    path: content.path,
                    resource_type,
                    properties: content.properties,
                }
            }
            None => ServerMessage::Absent {
                path: path.to_string(),
            },
        }
    }
}

pub fn encode_server_message(message: &ServerMessage) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}
