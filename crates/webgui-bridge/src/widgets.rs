//! Named widget handles, resolved once when the interface is built.

use std::collections::HashMap;

use webgui_common::BridgeError;

/// Lookup table from widget name to a typed handle. Asking for a name that
/// was never registered is an explicit error rather than a silent `None`.
#[derive(Debug, Clone)]
pub struct WidgetMap<H> {
    widgets: HashMap<String, H>,
}

impl<H> WidgetMap<H> {
    pub fn get(&self, name: &str) -> Result<&H, BridgeError> {
        self.widgets
            .get(name)
            .ok_or_else(|| BridgeError::WidgetNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut H, BridgeError> {
        self.widgets
            .get_mut(name)
            .ok_or_else(|| BridgeError::WidgetNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.widgets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl<H, N: Into<String>> FromIterator<(N, H)> for WidgetMap<H> {
    fn from_iter<I: IntoIterator<Item = (N, H)>>(iter: I) -> Self {
        Self {
            widgets: iter.into_iter().map(|(n, h)| (n.into(), h)).collect(),
        }
    }
}
