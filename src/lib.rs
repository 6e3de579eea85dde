pub mod app;
pub mod cli;
pub mod constants;
pub mod directory;
pub mod runtime;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use directory::{parse_csv, Dataset, Record, SheetSource};
pub use tui::run_ui;
pub use utils::DirectoryError;
