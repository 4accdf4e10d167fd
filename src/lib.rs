pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod server;
pub mod state;
