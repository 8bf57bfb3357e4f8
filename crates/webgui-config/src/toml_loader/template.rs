//! Default TOML config template.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# webgui configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "webgui"
# width = 800
# height = 600
# v_border = 20          # 0-200
# devtools = false

[bridge]
# delivery = "polling"   # polling, listener
# encoding = "json"      # json, token
# poll_timeout_ms = 100  # 1-10000
# echo = true
# sync_call_timeout_ms = 0  # 0 waits forever

[content]
# index = "html/index.html"

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##
}
