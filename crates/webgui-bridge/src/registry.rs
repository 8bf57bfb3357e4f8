use std::any::Any;
use std::collections::HashMap;

use tracing::debug;
use webgui_common::BridgeError;

use crate::bridge::BridgeId;
use crate::toolkit::ContentView;

/// Content views owned by the GUI thread, keyed by the bridge that created
/// them. Only reachable from inside an idle task, so it is never shared.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<BridgeId, Box<dyn ContentView>>,
    /// Toolkit-specific parent for new views (e.g. the native window).
    host: Option<Box<dyn Any>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the toolkit object new views are built into.
    pub fn set_host<T: Any>(&mut self, host: T) {
        self.host = Some(Box::new(host));
    }

    pub fn host<T: Any>(&self) -> Option<&T> {
        self.host.as_ref().and_then(|h| h.downcast_ref::<T>())
    }

    pub fn insert(&mut self, id: BridgeId, view: Box<dyn ContentView>) {
        debug!(bridge_id = id.get(), "view registered");
        self.views.insert(id, view);
    }

    pub fn get(&self, id: BridgeId) -> Option<&dyn ContentView> {
        self.views.get(&id).map(|v| v.as_ref())
    }

    /// Mutable access, failing with `ViewNotFound` for unknown ids.
    pub fn view_mut(&mut self, id: BridgeId) -> Result<&mut dyn ContentView, BridgeError> {
        match self.views.get_mut(&id) {
            Some(view) => Ok(view.as_mut()),
            None => Err(BridgeError::ViewNotFound(id.get())),
        }
    }

    pub fn remove(&mut self, id: BridgeId) -> bool {
        if self.views.remove(&id).is_some() {
            debug!(bridge_id = id.get(), "view destroyed");
            true
        } else {
            false
        }
    }

    /// Forward a host window resize to every view.
    pub fn host_resized(&mut self, width: u32, height: u32) {
        for view in self.views.values_mut() {
            view.host_resized(width, height);
        }
    }

    pub fn ids(&self) -> Vec<BridgeId> {
        self.views.keys().copied().collect()
    }

    /// Drop every view. Used when the loop shuts down.
    pub fn clear(&mut self) {
        for id in self.ids() {
            self.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
