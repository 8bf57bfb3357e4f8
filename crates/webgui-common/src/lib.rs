pub mod errors;
pub mod quit;

pub use errors::{BridgeError, ConfigError, WebGuiError};
pub use quit::QuitFlag;

pub type Result<T> = std::result::Result<T, WebGuiError>;
