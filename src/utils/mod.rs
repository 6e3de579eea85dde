// Gateway module for utils - follows the Train Station Pattern
// All external access must go through this gateway

mod errors;
mod logger;

pub use errors::DirectoryError;
pub use logger::{init_logger, LogTarget};
