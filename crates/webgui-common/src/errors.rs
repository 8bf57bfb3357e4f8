use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the GUI-thread bridge: scheduling, blocking calls, and
/// content-to-host decoding.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("gui event loop is not running")]
    LoopClosed,

    #[error("blocking call issued from the gui thread would deadlock")]
    ReentrantSyncCall,

    #[error("gui call panicked: {0}")]
    CallPanicked(String),

    #[error("gui call was dropped before it ran")]
    CallAbandoned,

    #[error("gui call timed out")]
    Timeout,

    #[error("no view registered for bridge {0}")]
    ViewNotFound(u32),

    #[error("widget not found: {0}")]
    WidgetNotFound(String),

    #[error("bridge {0} delivers events to a listener, not to a queue")]
    NotPolling(u32),

    #[error("payload decode error: {0}")]
    Decode(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("a gui event loop is already running")]
    AlreadyRunning,

    #[error("gui thread join failed: {0}")]
    ThreadJoin(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WebGuiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("bridge.poll_timeout_ms".into());
        assert_eq!(
            err.to_string(),
            "config validation error: bridge.poll_timeout_ms"
        );
    }

    #[test]
    fn bridge_error_display() {
        assert_eq!(
            BridgeError::LoopClosed.to_string(),
            "gui event loop is not running"
        );
        assert_eq!(
            BridgeError::ViewNotFound(3).to_string(),
            "no view registered for bridge 3"
        );
        assert_eq!(
            BridgeError::WidgetNotFound("browser_box".into()).to_string(),
            "widget not found: browser_box"
        );
        assert_eq!(
            BridgeError::CallPanicked("boom".into()).to_string(),
            "gui call panicked: boom"
        );
    }

    #[test]
    fn webgui_error_from_config() {
        let err: WebGuiError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, WebGuiError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn webgui_error_from_bridge() {
        let err: WebGuiError = BridgeError::Timeout.into();
        assert!(matches!(err, WebGuiError::Bridge(BridgeError::Timeout)));
        assert_eq!(err.to_string(), "gui call timed out");
    }

    #[test]
    fn webgui_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "index.html");
        let err: WebGuiError = io_err.into();
        assert!(matches!(err, WebGuiError::Io(_)));
        assert!(err.to_string().contains("index.html"));
    }
}
