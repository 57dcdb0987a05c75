pub mod buffer;
pub mod config;
pub mod lifecycle;
pub mod message;
pub mod payload;
pub mod stats;
pub mod tag;
pub mod topology;
