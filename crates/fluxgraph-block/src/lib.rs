#![deny(clippy::wildcard_imports)]

pub mod block;
pub mod config;
pub mod error;
mod infra;

pub use block::{Block, BlockEndpoint, BlockIo, BlockLogic, start_block, start_block_with_config};
pub use config::{BlockConfig, BlockEvent, BlockSnapshot};
pub use error::BlockError;
