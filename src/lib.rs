pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod service;
pub mod upstream;
