//! Turns page events into scripts for the chart page.

use std::collections::BTreeSet;

use serde_json::json;
use tracing::{debug, warn};
use webgui_bridge::{BrowserEvent, Encoding};
use webgui_webview::script;

pub struct Driver {
    width: u32,
    height: u32,
    v_border: u32,
    selected: BTreeSet<usize>,
}

impl Driver {
    pub fn new(width: u32, height: u32, v_border: u32) -> Self {
        Self {
            width,
            height,
            v_border,
            selected: BTreeSet::new(),
        }
    }

    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Script to send back for `event`, if any.
    pub fn dispatch(&mut self, event: &BrowserEvent) -> Option<String> {
        match event {
            BrowserEvent::DocumentReady => {
                script::resize_for_allocation(self.width, self.height, self.v_border)
            }
            BrowserEvent::BarClicked { index } | BrowserEvent::LabelClicked { index } => {
                if !self.selected.remove(index) {
                    self.selected.insert(*index);
                }
                debug!(index, selected = ?self.selected, "selection toggled");
                Some(script::call("select", &json!(self.selected())))
            }
            BrowserEvent::Unknown { name, .. } => {
                debug!(event = %name, "ignoring unknown event");
                None
            }
        }
    }

    /// Decode a polled message and dispatch it. Undecodable messages are
    /// logged and dropped.
    pub fn dispatch_raw(&mut self, raw: &str, encoding: Encoding) -> Option<String> {
        match BrowserEvent::decode(raw, encoding) {
            Ok(event) => self.dispatch(&event),
            Err(e) => {
                warn!(error = %e, "dropping undecodable message");
                None
            }
        }
    }
}
