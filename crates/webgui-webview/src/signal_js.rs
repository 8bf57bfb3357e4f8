//! Content-side half of the title signaling channel.
//!
//! The host can only observe the document title, so content reports events
//! by writing them there. Writing `"null"` first guarantees a change
//! notification even when the same payload is sent twice in a row; the host
//! discards that reset value.

/// Installs `window.webgui.send(msg)` and `window.webgui.emit(event, extra)`.
/// Injected as an initialization script into every page.
pub const SIGNAL_INIT_SCRIPT: &str = r#"
(function() {
    window.webgui = window.webgui || {};
    window.webgui.send = function(msg) {
        document.title = "null";
        document.title = msg;
    };
    window.webgui.emit = function(event, extra) {
        var payload = Object.assign({}, extra || {}, { event: event });
        window.webgui.send(JSON.stringify(payload));
    };
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resets_title_before_each_message() {
        let reset = SIGNAL_INIT_SCRIPT.find(r#"document.title = "null";"#).unwrap();
        let payload = SIGNAL_INIT_SCRIPT.find("document.title = msg;").unwrap();
        assert!(reset < payload);
    }

    #[test]
    fn exposes_send_and_emit() {
        assert!(SIGNAL_INIT_SCRIPT.contains("window.webgui.send = function(msg)"));
        assert!(SIGNAL_INIT_SCRIPT.contains("window.webgui.emit = function(event, extra)"));
    }
}
