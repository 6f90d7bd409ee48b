mod bridge;
mod config;
mod router;
