use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info, trace, warn};

use crate::channel::MessageChannel;
use crate::events::{BrowserEvent, Encoding};
use crate::invoker::panic_message;
use crate::signal;
use crate::toolkit::TitleSink;

use super::{BridgeId, BrowserHandle, Listener};

pub(super) enum Route {
    Queue(MessageChannel),
    Listener {
        listener: Listener,
        handle: BrowserHandle,
    },
}

/// Turns raw title notifications into queued messages or listener calls.
/// Runs inside the view's title-changed callback, i.e. on the GUI thread.
pub(super) struct SignalRouter {
    pub(super) id: BridgeId,
    pub(super) encoding: Encoding,
    pub(super) echo: bool,
    pub(super) route: Route,
}

impl SignalRouter {
    pub(super) fn handle(&self, raw: String) {
        let bridge_id = self.id.get();
        if signal::is_sentinel(&raw) {
            trace!(bridge_id, "title reset ignored");
            return;
        }
        debug!(bridge_id, len = raw.len(), "title changed");

        match &self.route {
            Route::Queue(queue) => {
                if self.echo {
                    info!(bridge_id, ">>> {raw}");
                }
                queue.put(raw);
            }
            Route::Listener { listener, handle } => {
                let event = match BrowserEvent::decode(&raw, self.encoding) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(bridge_id, error = %e, "content signal dropped");
                        return;
                    }
                };
                if self.echo {
                    info!(bridge_id, event = event.name(), ">>> {raw}");
                }
                let dispatched =
                    panic::catch_unwind(AssertUnwindSafe(|| listener(handle, event)));
                if let Err(payload) = dispatched {
                    error!(
                        bridge_id,
                        panic = %panic_message(payload.as_ref()),
                        "browser listener panicked"
                    );
                }
            }
        }
    }

    pub(super) fn into_sink(self) -> TitleSink {
        TitleSink::new(move |raw| self.handle(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessToolkit;
    use crate::lifecycle::GuiThread;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn queue_router(queue: MessageChannel) -> SignalRouter {
        SignalRouter {
            id: BridgeId::next(),
            encoding: Encoding::Json,
            echo: false,
            route: Route::Queue(queue),
        }
    }

    #[test]
    fn queue_route_skips_sentinel_and_keeps_raw() {
        let queue = MessageChannel::new();
        let sink = queue_router(queue.clone()).into_sink();

        sink.notify("null");
        sink.notify(r#"{"event":"document-ready"}"#);
        sink.notify("null");
        sink.notify("got-a-click");

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.get(Duration::ZERO).as_deref(),
            Some(r#"{"event":"document-ready"}"#)
        );
        assert_eq!(queue.get(Duration::ZERO).as_deref(), Some("got-a-click"));
    }

    #[test]
    fn listener_route_decodes_and_survives_bad_input() {
        let gui = GuiThread::start(HeadlessToolkit).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let id = BridgeId::next();
        let router = SignalRouter {
            id,
            encoding: Encoding::Json,
            echo: true,
            route: Route::Listener {
                listener: Arc::new(move |_: &BrowserHandle, event: BrowserEvent| {
                    log.lock().unwrap().push(event)
                }),
                handle: BrowserHandle::new(id, gui.invoker(), false),
            },
        };

        router.handle("null".into());
        router.handle("not json".into());
        router.handle(r#"{"event":"bar-clicked","index":2}"#.into());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![BrowserEvent::BarClicked { index: 2 }]
        );
        gui.stop().unwrap();
    }

    #[test]
    fn listener_panic_is_contained() {
        let gui = GuiThread::start(HeadlessToolkit).unwrap();
        let id = BridgeId::next();
        let router = SignalRouter {
            id,
            encoding: Encoding::Token,
            echo: false,
            route: Route::Listener {
                listener: Arc::new(|_: &BrowserHandle, _: BrowserEvent| panic!("listener bug")),
                handle: BrowserHandle::new(id, gui.invoker(), false),
            },
        };

        router.handle("document-ready".into());
        gui.stop().unwrap();
    }
}
