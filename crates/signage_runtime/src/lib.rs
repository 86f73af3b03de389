//! Signage runtime: executes timer effects and hosts a board on a background thread.
mod config;
mod driver;
mod handle;
mod settings;
mod types;

pub use config::{load_board, save_board, BoardConfig, ConfigError, WidgetEntry};
pub use driver::Driver;
pub use handle::RuntimeHandle;
pub use settings::RuntimeSettings;
pub use types::RuntimeEvent;
