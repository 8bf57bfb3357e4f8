//! Host-to-content commands. Content exposes plain functions; the host
//! calls them by executing script text such as `draw([...])`.

use serde_json::Value;

/// `function(arg)` with `arg` rendered as JSON.
pub fn call(function: &str, argument: &Value) -> String {
    call_with(function, std::slice::from_ref(argument))
}

/// `function(a, b, ...)` with every argument rendered as JSON.
pub fn call_with(function: &str, arguments: &[Value]) -> String {
    let rendered: Vec<String> = arguments.iter().map(Value::to_string).collect();
    format!("{function}({})", rendered.join(", "))
}

pub fn resize(width: u32, height: u32) -> String {
    format!("resize({width}, {height})")
}

/// Resize command for a view allocation, keeping `v_border` pixels free at
/// the bottom so the content never forces the view to grow. `None` while the
/// allocation is too small to be meaningful.
pub fn resize_for_allocation(width: u32, height: u32, v_border: u32) -> Option<String> {
    if width > 0 && height > v_border {
        Some(resize(width, height - v_border))
    } else {
        None
    }
}
