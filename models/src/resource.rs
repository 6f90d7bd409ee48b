//! Renderable resource values.
//!
//! A [`Resource`] is immutable once built. Its content is an enum, so the
//! payload always matches the content kind.

use crate::wire::WireResource;

use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};
use url::Url;

/// Discriminant of [`ResourceContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentKind {
    InlineMarkup,
    ExternalReference,
    RemoteProgram,
}

/// Framework a remote program targets.
///
/// Kept as a free-form string so that tags the host does not know can still
/// be represented; the renderer is the one that rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameworkTag(String);

impl FrameworkTag {
    pub const REACT: &'static str = "react";
    pub const WEB_COMPONENTS: &'static str = "webcomponents";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn react() -> Self {
        Self::new(Self::REACT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FrameworkTag {
    fn default() -> Self {
        Self::react()
    }
}

impl Display for FrameworkTag {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceContent {
    /// Markup rendered inside the isolation boundary.
    InlineMarkup { html: String },
    /// Out-of-process content embedded by reference.
    ExternalReference { url: Url },
    /// Script that builds UI through a host-side framework adapter.
    RemoteProgram {
        script: String,
        framework: FrameworkTag,
    },
}

impl ResourceContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            ResourceContent::InlineMarkup { .. } => ContentKind::InlineMarkup,
            ResourceContent::ExternalReference { .. } => ContentKind::ExternalReference,
            ResourceContent::RemoteProgram { .. } => ContentKind::RemoteProgram,
        }
    }

    /// The raw text payload regardless of kind.
    pub fn payload_text(&self) -> &str {
        match self {
            ResourceContent::InlineMarkup { html } => html,
            ResourceContent::ExternalReference { url } => url.as_str(),
            ResourceContent::RemoteProgram { script, .. } => script,
        }
    }
}

/// Descriptive metadata. Never consulted for security decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ResourceMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

/// How the payload is carried on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Plain `text` field.
    #[default]
    Text,
    /// Base64 `blob` field.
    Blob,
}

/// Canonical description of one piece of renderable content.
///
/// Serializes through [`WireResource`], so `serde_json::to_value(&resource)`
/// yields the `{type: "resource", resource: {...}}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireResource", try_from = "WireResource")]
pub struct Resource {
    pub(crate) uri: String,
    pub(crate) content: ResourceContent,
    pub(crate) metadata: Option<ResourceMetadata>,
    pub(crate) encoding: Encoding,
}

impl Resource {
    /// Assembles a resource from trusted parts without validation.
    ///
    /// Generators whose uris and payloads are fixed at compile time use this;
    /// anything assembled from outside input goes through
    /// [`ResourceBuilder`](crate::ResourceBuilder).
    pub fn from_parts(
        uri: impl Into<String>,
        content: ResourceContent,
        metadata: Option<ResourceMetadata>,
    ) -> Self {
        Self {
            uri: uri.into(),
            content,
            metadata,
            encoding: Encoding::Text,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn content(&self) -> &ResourceContent {
        &self.content
    }

    pub fn content_kind(&self) -> ContentKind {
        self.content.kind()
    }

    pub fn metadata(&self) -> Option<&ResourceMetadata> {
        self.metadata.as_ref()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.title.as_deref())
    }

    /// Markup payload when this is an inline-markup resource.
    pub fn html(&self) -> Option<&str> {
        match &self.content {
            ResourceContent::InlineMarkup { html } => Some(html),
            _ => None,
        }
    }
}
