mod action;
mod builder;
mod wire;
