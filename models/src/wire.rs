//! JSON wire format for resources.
//!
//! ```json
//! { "type": "resource",
//!   "resource": { "uri": "ui://counter/interactive", "mimeType": "text/html",
//!                 "text": "<div>…</div>", "meta": { "title": "Counter" } } }
//! ```

use crate::error::model_error::ModelError;
use crate::resource::{Encoding, FrameworkTag, Resource, ResourceContent, ResourceMetadata};
use crate::ErrorLocation;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use url::Url;

pub const MIME_HTML: &str = "text/html";
pub const MIME_URI_LIST: &str = "text/uri-list";
pub const MIME_REMOTE_PROGRAM: &str = "application/vnd.mcp-ui.remote-dom+javascript";

const RESOURCE_TYPE: &str = "resource";
const FRAMEWORK_PARAM: &str = "framework";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub resource: WireResourceBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResourceBody {
    pub uri: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
    #[serde(default, alias = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResourceMetadata>,
}

/// MIME type for a remote program targeting `framework`.
///
/// Tags that are not plain MIME tokens are written as a quoted string so
/// `;`, `=` and spaces survive the trip back through [`parse_mime`].
pub fn remote_program_mime(framework: &FrameworkTag) -> String {
    let tag = framework.as_str();
    if !tag.is_empty() && tag.chars().all(is_token_char) {
        return format!("{MIME_REMOTE_PROGRAM}; {FRAMEWORK_PARAM}={tag}");
    }

    let mut quoted = String::with_capacity(tag.len() + 2);
    quoted.push('"');
    for c in tag.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    format!("{MIME_REMOTE_PROGRAM}; {FRAMEWORK_PARAM}={quoted}")
}

/// RFC 2045 `token` characters.
fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?=".contains(c)
}

/// Splits `type/subtype; key=value` into the essence and the framework
/// parameter. Values may be tokens or quoted strings.
fn parse_mime(mime: &str) -> (&str, Option<String>) {
    let (essence, mut rest) = mime.split_once(';').unwrap_or((mime, ""));
    let mut framework = None;

    while !rest.is_empty() {
        let Some((key, after_key)) = rest.split_once('=') else {
            break;
        };
        let key = key.trim();
        let after_key = after_key.trim_start();

        let (value, remainder) = if let Some(body) = after_key.strip_prefix('"') {
            let mut value = String::new();
            let mut chars = body.char_indices();
            let mut end = body.len();
            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => {
                        end = i + 1;
                        break;
                    }
                    _ => value.push(c),
                }
            }
            let tail = &body[end..];
            let tail = tail.split_once(';').map_or("", |(_, next)| next);
            (value, tail)
        } else {
            let (value, tail) = after_key.split_once(';').unwrap_or((after_key, ""));
            (value.trim().to_string(), tail)
        };

        if key == FRAMEWORK_PARAM && framework.is_none() {
            framework = Some(value);
        }
        rest = remainder;
    }

    (essence.trim(), framework)
}

/// First usable line of a `text/uri-list` payload (comments start with `#`).
fn first_uri(list: &str) -> Option<&str> {
    list.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
}

impl From<Resource> for WireResource {
    fn from(resource: Resource) -> Self {
        let mime_type = match &resource.content {
            ResourceContent::InlineMarkup { .. } => MIME_HTML.to_string(),
            ResourceContent::ExternalReference { .. } => MIME_URI_LIST.to_string(),
            ResourceContent::RemoteProgram { framework, .. } => remote_program_mime(framework),
        };

        let payload = resource.content.payload_text();
        let (text, blob) = match resource.encoding {
            Encoding::Text => (Some(payload.to_string()), None),
            Encoding::Blob => (None, Some(STANDARD.encode(payload.as_bytes()))),
        };

        WireResource {
            kind: RESOURCE_TYPE.to_string(),
            resource: WireResourceBody {
                uri: resource.uri,
                mime_type,
                text,
                blob,
                meta: resource.metadata,
            },
        }
    }
}

impl TryFrom<WireResource> for Resource {
    type Error = ModelError;

    fn try_from(wire: WireResource) -> Result<Self, Self::Error> {
        if wire.kind != RESOURCE_TYPE {
            return Err(ModelError::Wire {
                message: format!("Expected type \"{RESOURCE_TYPE}\", got \"{}\"", wire.kind),
                location: ErrorLocation::caller(),
            });
        }

        let body = wire.resource;
        let (payload, encoding) = match (body.text, body.blob) {
            (Some(text), None) => (text, Encoding::Text),
            (None, Some(blob)) => (String::from_utf8(STANDARD.decode(blob)?)?, Encoding::Blob),
            (Some(_), Some(_)) => {
                return Err(ModelError::Wire {
                    message: String::from("Resource carries both text and blob"),
                    location: ErrorLocation::caller(),
                });
            }
            (None, None) => {
                return Err(ModelError::Wire {
                    message: String::from("Resource carries neither text nor blob"),
                    location: ErrorLocation::caller(),
                });
            }
        };

        let (essence, framework) = parse_mime(&body.mime_type);
        let content = match essence {
            MIME_HTML => ResourceContent::InlineMarkup { html: payload },
            MIME_URI_LIST => {
                let first = first_uri(&payload).ok_or_else(|| ModelError::Wire {
                    message: String::from("uri-list payload contains no URI"),
                    location: ErrorLocation::caller(),
                })?;
                ResourceContent::ExternalReference {
                    url: Url::parse(first)?,
                }
            }
            MIME_REMOTE_PROGRAM => ResourceContent::RemoteProgram {
                script: payload,
                framework: framework.map(FrameworkTag::new).unwrap_or_default(),
            },
            other => {
                return Err(ModelError::Wire {
                    message: format!("Unsupported mimeType: {other}"),
                    location: ErrorLocation::caller(),
                });
            }
        };

        Ok(Resource {
            uri: body.uri,
            content,
            metadata: body.meta,
            encoding,
        })
    }
}

impl Resource {
    pub fn to_wire(&self) -> WireResource {
        WireResource::from(self.clone())
    }

    pub fn from_wire(wire: WireResource) -> Result<Self, ModelError> {
        Self::try_from(wire)
    }
}
