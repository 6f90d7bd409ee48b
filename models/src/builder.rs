use crate::error::model_error::ModelError;
use crate::resource::{Encoding, FrameworkTag, Resource, ResourceContent, ResourceMetadata};
use crate::{ErrorLocation, UI_URI_SCHEME};

use std::panic::Location;

use url::Url;

/// Builder for creating validated Resource instances.
///
/// Exactly one of [`html`](Self::html), [`external_url`](Self::external_url)
/// or [`remote_program`](Self::remote_program) must be called.
#[derive(Debug, Default)]
pub struct ResourceBuilder {
    uri: Option<String>,
    contents: Vec<ResourceContent>,
    title: Option<String>,
    description: Option<String>,
    encoding: Encoding,
}

impl ResourceBuilder {
    pub fn new(uri: impl Into<String>) -> Self {
        Self::default().with_uri(uri)
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.contents
            .push(ResourceContent::InlineMarkup { html: html.into() });
        self
    }

    pub fn external_url(mut self, url: Url) -> Self {
        self.contents.push(ResourceContent::ExternalReference { url });
        self
    }

    pub fn remote_program(mut self, script: impl Into<String>, framework: FrameworkTag) -> Self {
        self.contents.push(ResourceContent::RemoteProgram {
            script: script.into(),
            framework,
        });
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Build the Resource with validation.
    #[track_caller]
    pub fn build(self) -> Result<Resource, ModelError> {
        let uri = self.uri.ok_or_else(|| ModelError::Validation {
            message: String::from("URI is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !uri.starts_with(UI_URI_SCHEME) || uri.len() == UI_URI_SCHEME.len() {
            return Err(ModelError::Validation {
                message: format!("Invalid resource URI: {uri}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut contents = self.contents.into_iter();
        let content = match (contents.next(), contents.next()) {
            (Some(content), None) => content,
            (None, _) => {
                return Err(ModelError::Validation {
                    message: String::from("Content is required"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            (Some(_), Some(_)) => {
                return Err(ModelError::Validation {
                    message: String::from("Exactly one content payload is allowed"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        match &content {
            ResourceContent::InlineMarkup { html } if html.trim().is_empty() => {
                return Err(ModelError::Validation {
                    message: String::from("Markup cannot be empty"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            ResourceContent::RemoteProgram { script, .. } if script.trim().is_empty() => {
                return Err(ModelError::Validation {
                    message: String::from("Remote program script cannot be empty"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            ResourceContent::RemoteProgram { framework, .. } if framework.as_str().is_empty() => {
                return Err(ModelError::Validation {
                    message: String::from("Framework tag cannot be empty"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            _ => {}
        }

        let metadata = match (self.title, self.description) {
            (None, None) => None,
            (title, description) => Some(ResourceMetadata { title, description }),
        };

        Ok(Resource {
            uri,
            content,
            metadata,
            encoding: self.encoding,
        })
    }
}
