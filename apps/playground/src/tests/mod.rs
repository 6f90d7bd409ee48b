mod connection;
mod logger;
