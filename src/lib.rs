pub mod cli;
pub mod config;
pub mod content;
pub mod logging;
pub mod membership;
pub mod protocol;
pub mod resource;
pub mod server;
