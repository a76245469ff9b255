pub mod analysis;
pub mod config;
pub mod error;
pub mod pose;
pub mod recording;
pub mod store;
pub mod template;
