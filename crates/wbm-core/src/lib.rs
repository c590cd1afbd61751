pub mod client;
pub mod config;
pub mod digest;
pub mod logging;
pub mod mirror;
pub mod mirror_path;
pub mod retry;
pub mod storage;
pub mod timemap;
pub mod url_model;
