mod bridge;
mod helpers;
