mod actor;
mod endpoint;
mod handle;
mod handlers;
mod io;
mod logic;
mod messages;
mod startup;

pub use endpoint::BlockEndpoint;
pub use handle::Block;
pub use io::BlockIo;
pub use logic::BlockLogic;
pub use startup::{start_block, start_block_with_config};
