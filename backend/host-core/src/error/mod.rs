pub mod bridge;
pub mod config;
pub mod render;
pub mod router;
pub mod session;

pub use bridge::BridgeError;
pub use config::ConfigError;
pub use render::RenderError;
pub use router::RouterError;
pub use session::SessionError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Model(#[from] models::ModelError),
}
