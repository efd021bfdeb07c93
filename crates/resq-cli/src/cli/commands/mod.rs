//! CLI command handlers. Each command is in its own file.

mod batch;
mod call;
mod config_path;

pub use batch::run_batch_file;
pub use call::run_call;
pub use config_path::run_config_path;
