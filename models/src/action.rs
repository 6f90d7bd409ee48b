//! Actions emitted from inside an isolated surface.

use crate::error::model_error::ModelError;
use crate::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// The closed set of action kinds the host understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Tool,
    Prompt,
    Link,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Tool => "tool",
            ActionKind::Prompt => "prompt",
            ActionKind::Link => "link",
        }
    }
}

impl FromStr for ActionKind {
    type Err = ModelError;

    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tool" => Ok(ActionKind::Tool),
            "prompt" => Ok(ActionKind::Prompt),
            "link" => Ok(ActionKind::Link),
            other => Err(ModelError::Validation {
                message: format!("Unknown action kind: {other}"),
                location: ErrorLocation::caller(),
            }),
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

/// Loose payload shape shared by every kind; only the fields of the
/// action's kind are populated when serializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A structured request from a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Tool {
        tool_name: String,
        params: Map<String, Value>,
    },
    Prompt {
        prompt: String,
    },
    Link {
        url: Url,
    },
}

impl Action {
    pub fn tool(tool_name: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Action::Tool {
            tool_name: tool_name.into(),
            params,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Tool { .. } => ActionKind::Tool,
            Action::Prompt { .. } => ActionKind::Prompt,
            Action::Link { .. } => ActionKind::Link,
        }
    }

    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Action::Tool { tool_name, .. } => Some(tool_name),
            _ => None,
        }
    }

    /// Validates `payload` against `kind` and keeps only the relevant fields.
    ///
    /// A tool action without `params` gets an empty object; `params` that is
    /// present but not an object is rejected.
    #[track_caller]
    pub fn from_parts(kind: ActionKind, payload: ActionPayload) -> Result<Self, ModelError> {
        match kind {
            ActionKind::Tool => {
                let tool_name = payload
                    .tool_name
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| ModelError::Validation {
                        message: String::from("Tool action requires payload.toolName"),
                        location: ErrorLocation::caller(),
                    })?;
                let params = match payload.params {
                    None | Some(Value::Null) => Map::new(),
                    Some(Value::Object(map)) => map,
                    Some(other) => {
                        return Err(ModelError::Validation {
                            message: format!("payload.params must be an object, got {other}"),
                            location: ErrorLocation::caller(),
                        });
                    }
                };
                Ok(Action::Tool { tool_name, params })
            }
            ActionKind::Prompt => {
                let prompt = payload.prompt.ok_or_else(|| ModelError::Validation {
                    message: String::from("Prompt action requires payload.prompt"),
                    location: ErrorLocation::caller(),
                })?;
                Ok(Action::Prompt { prompt })
            }
            ActionKind::Link => {
                let raw = payload.url.ok_or_else(|| ModelError::Validation {
                    message: String::from("Link action requires payload.url"),
                    location: ErrorLocation::caller(),
                })?;
                Ok(Action::Link {
                    url: Url::parse(&raw)?,
                })
            }
        }
    }

    /// The kind-specific payload, with every other field absent.
    pub fn payload(&self) -> ActionPayload {
        match self {
            Action::Tool { tool_name, params } => ActionPayload {
                tool_name: Some(tool_name.clone()),
                params: Some(Value::Object(params.clone())),
                ..ActionPayload::default()
            },
            Action::Prompt { prompt } => ActionPayload {
                prompt: Some(prompt.clone()),
                ..ActionPayload::default()
            },
            Action::Link { url } => ActionPayload {
                url: Some(url.to_string()),
                ..ActionPayload::default()
            },
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ActionRepr {
    kind: ActionKind,
    #[serde(default)]
    payload: ActionPayload,
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ActionRepr {
            kind: self.kind(),
            payload: self.payload(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = ActionRepr::deserialize(deserializer)?;
        Action::from_parts(repr.kind, repr.payload).map_err(serde::de::Error::custom)
    }
}
