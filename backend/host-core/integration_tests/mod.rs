mod bridge_tests;
mod config;
