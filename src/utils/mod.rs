pub mod app_config;
pub mod catalogue;
pub mod config;
pub mod logger;
pub mod pagination;
pub mod permissions;
pub mod query;
pub mod similarity;
pub mod source;
pub mod source_watcher;
