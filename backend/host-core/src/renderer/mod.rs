//! Isolation Renderer.
//!
//! Chooses a mount strategy per content kind and tracks the lifetime of each
//! surface:
//!
//! - inline markup and remote programs are mounted as sandboxed documents
//! - external references are embedded by url, without sandbox elevation
//!
//! A surface is re-created whenever its document changes. Each re-creation
//! bumps the surface [`Generation`]; mounting an identical document is a no-op.

pub mod adapter;
pub mod document;
pub mod sandbox;

pub use adapter::{AdapterRegistry, FrameworkAdapter, ReactAdapter, WebComponentsAdapter};
pub use sandbox::{Capability, SandboxPolicy};

use crate::error::render::RenderError;

use common::{ErrorLocation, Generation, SurfaceId};
use models::{Resource, ResourceContent};

use std::collections::BTreeMap;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

pub const DEFAULT_MIN_HEIGHT: u32 = 300;
pub const DEFAULT_HEIGHT_PADDING: u32 = 20;

/// How a resource is placed into its surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum MountPlan {
    /// A complete `srcdoc` document inside a sandboxed frame.
    Sandboxed {
        document: String,
        sandbox: SandboxPolicy,
    },
    /// Out-of-process content loaded from `src`.
    Embedded { src: Url },
}

impl MountPlan {
    fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        match self {
            MountPlan::Sandboxed { document, sandbox } => {
                hasher.update(b"sandboxed\n");
                hasher.update(sandbox.attribute().as_bytes());
                hasher.update(b"\n");
                hasher.update(document.as_bytes());
            }
            MountPlan::Embedded { src } => {
                hasher.update(b"embedded\n");
                hasher.update(src.as_str().as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceStatus {
    Unmounted,
    Mounted,
    /// External content refused to load; a fallback document is shown.
    EmbedRefused,
    /// The last resource could not be rendered.
    Unrenderable,
}

/// Measured content size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// One isolated rendering slot.
#[derive(Debug, Clone)]
pub struct Surface {
    pub id: SurfaceId,
    pub generation: Generation,
    pub status: SurfaceStatus,
    pub uri: Option<String>,
    pub plan: Option<MountPlan>,
    /// SHA-256 (hex) of the mounted plan.
    pub digest: Option<String>,
    pub size: Option<SurfaceSize>,
    /// Document shown instead of the plan after an embed refusal.
    pub fallback: Option<String>,
}

impl Surface {
    fn new(id: SurfaceId) -> Self {
        Self {
            id,
            generation: Generation::UNMOUNTED,
            status: SurfaceStatus::Unmounted,
            uri: None,
            plan: None,
            digest: None,
            size: None,
            fallback: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    /// A new document was mounted under `generation`.
    Mounted {
        generation: Generation,
        plan: MountPlan,
    },
    /// The document is identical to the mounted one.
    Unchanged { generation: Generation },
}

impl MountOutcome {
    pub fn generation(&self) -> Generation {
        match self {
            MountOutcome::Mounted { generation, .. } | MountOutcome::Unchanged { generation } => {
                *generation
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RendererSettings {
    pub sandbox: SandboxPolicy,
    pub min_height: u32,
    pub padding: u32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            sandbox: SandboxPolicy::default(),
            min_height: DEFAULT_MIN_HEIGHT,
            padding: DEFAULT_HEIGHT_PADDING,
        }
    }
}

#[derive(Debug)]
pub struct IsolationRenderer {
    settings: RendererSettings,
    adapters: AdapterRegistry,
    surfaces: BTreeMap<SurfaceId, Surface>,
}

impl IsolationRenderer {
    pub fn new(settings: RendererSettings, adapters: AdapterRegistry) -> Self {
        Self {
            settings,
            adapters,
            surfaces: BTreeMap::new(),
        }
    }

    /// Renderer with default settings and the built-in adapters.
    pub fn with_defaults() -> Self {
        Self::new(RendererSettings::default(), AdapterRegistry::with_builtins())
    }

    /// Mount strategy for `resource`, without touching any surface.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedFramework`] if a remote program
    /// declares a framework with no registered adapter.
    #[track_caller]
    pub fn plan(&self, resource: &Resource) -> Result<MountPlan, RenderError> {
        match resource.content() {
            ResourceContent::InlineMarkup { html } => Ok(MountPlan::Sandboxed {
                document: document::inline_document(html),
                sandbox: self.settings.sandbox.clone(),
            }),
            ResourceContent::ExternalReference { url } => {
                Ok(MountPlan::Embedded { src: url.clone() })
            }
            ResourceContent::RemoteProgram { script, framework } => {
                let adapter =
                    self.adapters
                        .get(framework)
                        .ok_or_else(|| RenderError::UnsupportedFramework {
                            framework: framework.to_string(),
                            location: ErrorLocation::caller(),
                        })?;
                Ok(MountPlan::Sandboxed {
                    document: document::program_document(
                        adapter.framework(),
                        &adapter.bootstrap(),
                        script,
                    ),
                    sandbox: self.settings.sandbox.clone(),
                })
            }
        }
    }

    /// Mounts `resource` into `surface`, creating the surface on first use.
    ///
    /// A failed mount still ends the previous mount: the generation advances
    /// and the surface is marked [`SurfaceStatus::Unrenderable`].
    ///
    /// # Errors
    ///
    /// See [`plan`](Self::plan).
    #[track_caller]
    pub fn mount(
        &mut self,
        surface: &SurfaceId,
        resource: &Resource,
    ) -> Result<MountOutcome, RenderError> {
        let planned = self.plan(resource);
        let entry = self
            .surfaces
            .entry(surface.clone())
            .or_insert_with(|| Surface::new(surface.clone()));

        let plan = match planned {
            Ok(plan) => plan,
            Err(e) => {
                error!("Cannot render {} on {}: {}", resource.uri(), surface, e);
                entry.generation = entry.generation.next();
                entry.status = SurfaceStatus::Unrenderable;
                entry.uri = Some(resource.uri().to_string());
                entry.plan = None;
                entry.digest = None;
                entry.fallback = None;
                return Err(e);
            }
        };

        let digest = plan.digest();
        if entry.status == SurfaceStatus::Mounted && entry.digest.as_deref() == Some(digest.as_str()) {
            return Ok(MountOutcome::Unchanged {
                generation: entry.generation,
            });
        }

        entry.generation = entry.generation.next();
        entry.status = SurfaceStatus::Mounted;
        entry.uri = Some(resource.uri().to_string());
        entry.plan = Some(plan.clone());
        entry.digest = Some(digest);
        entry.fallback = None;

        info!(
            "Mounted {} on {} at {}",
            resource.uri(),
            surface,
            entry.generation
        );
        Ok(MountOutcome::Mounted {
            generation: entry.generation,
            plan,
        })
    }

    /// Records a size report; returns the clamped size to apply.
    ///
    /// Reports for unknown surfaces or stale generations are ignored. A zero
    /// height means the surface could not measure itself, so the last known
    /// size is kept.
    pub fn report_size(
        &mut self,
        surface: &SurfaceId,
        generation: Generation,
        reported: SurfaceSize,
    ) -> Option<SurfaceSize> {
        let entry = self.surfaces.get_mut(surface)?;
        if generation != entry.generation {
            return None;
        }
        if reported.height == 0 {
            return entry.size;
        }

        let size = SurfaceSize {
            width: reported.width,
            height: reported
                .height
                .saturating_add(self.settings.padding)
                .max(self.settings.min_height),
        };
        entry.size = Some(size);
        Some(size)
    }

    /// Records that the host could not embed the external content of the
    /// current mount; returns the fallback document to show instead.
    ///
    /// Ignored unless the current mount of `surface` at `generation` is
    /// [`MountPlan::Embedded`].
    pub fn report_embed_failure(
        &mut self,
        surface: &SurfaceId,
        generation: Generation,
    ) -> Option<String> {
        let entry = self.surfaces.get_mut(surface)?;
        if generation != entry.generation {
            return None;
        }
        let src = match &entry.plan {
            Some(MountPlan::Embedded { src }) => src.clone(),
            _ => return None,
        };

        warn!("{} refused to embed on {}", src, surface);
        let fallback = document::embed_refused_document(src.as_str());
        entry.status = SurfaceStatus::EmbedRefused;
        entry.fallback = Some(fallback.clone());
        Some(fallback)
    }

    /// Tears `surface` down, returning its final state.
    pub fn unmount(&mut self, surface: &SurfaceId) -> Option<Surface> {
        let removed = self.surfaces.remove(surface);
        if removed.is_some() {
            info!("Unmounted {surface}");
        }
        removed
    }

    pub fn surface(&self, surface: &SurfaceId) -> Option<&Surface> {
        self.surfaces.get(surface)
    }

    /// Current generation of `surface`, or [`Generation::UNMOUNTED`].
    pub fn current_generation(&self, surface: &SurfaceId) -> Generation {
        self.surfaces
            .get(surface)
            .map(|entry| entry.generation)
            .unwrap_or(Generation::UNMOUNTED)
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }
}
