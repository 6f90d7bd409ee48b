use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

/// Sandbox capabilities a surface may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Scripts,
    Forms,
    Modals,
    Popups,
    SameOrigin,
    TopNavigation,
}

impl Capability {
    /// Capabilities that may ever reach a surface.
    pub const ALLOWED: [Capability; 3] = [Capability::Scripts, Capability::Forms, Capability::Modals];

    /// Token used in the iframe `sandbox` attribute.
    pub fn token(self) -> &'static str {
        match self {
            Capability::Scripts => "allow-scripts",
            Capability::Forms => "allow-forms",
            Capability::Modals => "allow-modals",
            Capability::Popups => "allow-popups",
            Capability::SameOrigin => "allow-same-origin",
            Capability::TopNavigation => "allow-top-navigation",
        }
    }

    pub fn is_allowed(self) -> bool {
        Self::ALLOWED.contains(&self)
    }
}

/// Capabilities granted to one sandboxed surface.
///
/// Always a subset of [`Capability::ALLOWED`], so a policy can never combine
/// same-origin access with script execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SandboxPolicy {
    capabilities: BTreeSet<Capability>,
}

impl SandboxPolicy {
    /// Intersects `requested` with the allow-list.
    pub fn from_requested(requested: impl IntoIterator<Item = Capability>) -> Self {
        let capabilities = requested
            .into_iter()
            .filter(|capability| {
                let allowed = capability.is_allowed();
                if !allowed {
                    debug!("Dropping sandbox capability {}", capability.token());
                }
                allowed
            })
            .collect();
        Self { capabilities }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    /// Value for the iframe `sandbox` attribute, e.g. `allow-scripts allow-forms`.
    pub fn attribute(&self) -> String {
        self.capabilities
            .iter()
            .map(|capability| capability.token())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::from_requested([Capability::Scripts, Capability::Forms])
    }
}
