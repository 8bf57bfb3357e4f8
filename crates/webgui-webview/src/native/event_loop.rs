use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use tao::dpi::LogicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::platform::run_return::EventLoopExtRunReturn;
use tao::window::{Window, WindowBuilder};
use tracing::{debug, info};

use webgui_bridge::{GuiLoop, IdleScheduler, IdleTask, Toolkit, ViewRegistry};
use webgui_common::{BridgeError, QuitFlag};

pub(crate) enum LoopCommand {
    Run(IdleTask),
    Quit,
}

/// Native window parameters.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "webgui".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Toolkit opening one native window on the GUI thread. Views are built
/// into that window.
pub struct NativeToolkit {
    window: WindowSettings,
    on_close: Option<QuitFlag>,
}

impl NativeToolkit {
    pub fn new(window: WindowSettings) -> Self {
        Self {
            window,
            on_close: None,
        }
    }

    /// Raise `flag` when the user closes the window.
    pub fn quit_on_close(mut self, flag: QuitFlag) -> Self {
        self.on_close = Some(flag);
        self
    }
}

impl Toolkit for NativeToolkit {
    fn create_loop(self) -> Result<Box<dyn GuiLoop>, BridgeError> {
        #[allow(unused_mut)]
        let mut builder = EventLoopBuilder::<LoopCommand>::with_user_event();
        #[cfg(any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd",
        ))]
        {
            use tao::platform::unix::EventLoopBuilderExtUnix;
            builder.with_any_thread(true);
        }
        #[cfg(target_os = "windows")]
        {
            use tao::platform::windows::EventLoopBuilderExtWindows;
            builder.with_any_thread(true);
        }
        let event_loop = builder.build();

        let window = WindowBuilder::new()
            .with_title(&self.window.title)
            .with_inner_size(LogicalSize::new(
                f64::from(self.window.width),
                f64::from(self.window.height),
            ))
            .build(&event_loop)
            .map_err(|e| BridgeError::Backend(format!("failed to create window: {e}")))?;

        let scheduler = NativeScheduler {
            proxy: Mutex::new(event_loop.create_proxy()),
            loop_thread: thread::current().id(),
        };
        debug!(title = %self.window.title, "native window created");

        Ok(Box::new(NativeLoop {
            event_loop,
            window: Rc::new(window),
            scheduler: Arc::new(scheduler),
            on_close: self.on_close,
        }))
    }

    fn exclusive(&self) -> bool {
        true
    }
}

struct NativeScheduler {
    proxy: Mutex<EventLoopProxy<LoopCommand>>,
    loop_thread: ThreadId,
}

impl NativeScheduler {
    fn send(&self, command: LoopCommand) -> Result<(), BridgeError> {
        let proxy = self.proxy.lock().unwrap_or_else(|e| e.into_inner());
        proxy
            .send_event(command)
            .map_err(|_| BridgeError::LoopClosed)
    }
}

impl IdleScheduler for NativeScheduler {
    fn schedule(&self, task: IdleTask) -> Result<(), BridgeError> {
        self.send(LoopCommand::Run(task))
    }

    fn quit(&self) -> Result<(), BridgeError> {
        self.send(LoopCommand::Quit)
    }

    fn is_loop_thread(&self) -> bool {
        thread::current().id() == self.loop_thread
    }
}

struct NativeLoop {
    event_loop: EventLoop<LoopCommand>,
    window: Rc<Window>,
    scheduler: Arc<NativeScheduler>,
    on_close: Option<QuitFlag>,
}

impl GuiLoop for NativeLoop {
    fn scheduler(&self) -> Arc<dyn IdleScheduler> {
        self.scheduler.clone()
    }

    fn run(self: Box<Self>) -> Result<(), BridgeError> {
        let NativeLoop {
            mut event_loop,
            window,
            scheduler: _,
            on_close,
        } = *self;

        let mut views = ViewRegistry::new();
        views.set_host(Rc::clone(&window));

        event_loop.run_return(|event, _target, control_flow| {
            *control_flow = ControlFlow::Wait;

            match event {
                Event::UserEvent(LoopCommand::Run(task)) => task(&mut views),
                Event::UserEvent(LoopCommand::Quit) => {
                    views.clear();
                    *control_flow = ControlFlow::Exit;
                }
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    info!("window closed");
                    if let Some(flag) = &on_close {
                        flag.request();
                    }
                    views.clear();
                    *control_flow = ControlFlow::Exit;
                }
                Event::WindowEvent {
                    event: WindowEvent::Resized(size),
                    ..
                } => views.host_resized(size.width, size.height),
                _ => {}
            }
        });

        drop(views);
        drop(window);
        Ok(())
    }
}
