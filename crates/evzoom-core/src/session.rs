//! Event loop
//!
//! A [`Session`] is the single consumer of viewer events. Pointer sources and
//! the clock ([`spawn_ticker`]) are producers holding [`EventSender`]s; every
//! event is run through the [`Viewer`] and the resulting requests are handed
//! to the [`Renderer`] in order.
use crate::data::ZoomData;
use crate::visual::Renderer;
use crate::zoom::Viewer;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewerEvent {
    PointerMove { x: f64, y: f64 },
    Tick,
    Reload { data: ZoomData },
    Shutdown,
}

#[derive(Clone, Debug)]
pub struct EventSender(Sender<ViewerEvent>);

impl EventSender {
    /// Returns `false` once the session is gone.
    pub fn send(&self, event: ViewerEvent) -> bool {
        self.0.send(event).is_ok()
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> bool {
        self.send(ViewerEvent::PointerMove { x, y })
    }

    pub fn shutdown(&self) -> bool {
        self.send(ViewerEvent::Shutdown)
    }
}

pub struct Session<R: Renderer> {
    viewer: Viewer,
    renderer: R,
    sender: Sender<ViewerEvent>,
    events: Receiver<ViewerEvent>,
    handled: usize,
}

impl<R: Renderer> Session<R> {
    /// Starts a session and plays the glyph intro.
    pub fn new(viewer: Viewer, mut renderer: R) -> Self {
        renderer.apply(&viewer.intro());
        let (sender, events) = mpsc::channel();
        Self {
            viewer,
            renderer,
            sender,
            events,
            handled: 0,
        }
    }

    pub fn sender(&self) -> EventSender {
        EventSender(self.sender.clone())
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Number of events handled so far.
    pub fn handled(&self) -> usize {
        self.handled
    }

    pub fn handle(&mut self, event: ViewerEvent) -> ControlFlow<()> {
        self.handled += 1;
        let requests = match event {
            ViewerEvent::PointerMove { x, y } => self.viewer.pointer_move(x, y),
            ViewerEvent::Tick => self.viewer.tick(),
            ViewerEvent::Reload { data } => {
                let requests = self.viewer.reload(data);
                self.renderer.reset(self.viewer.data(), self.viewer.config());
                self.renderer.apply(&requests);
                self.viewer.intro()
            }
            ViewerEvent::Shutdown => {
                info!("session shut down after {} events", self.handled);
                return ControlFlow::Break(());
            }
        };
        if !requests.is_empty() {
            self.renderer.apply(&requests);
        }
        ControlFlow::Continue(())
    }

    /// Handles whatever is queued without blocking. Stops early on shutdown.
    pub fn run_pending(&mut self) -> ControlFlow<()> {
        while let Ok(event) = self.events.try_recv() {
            self.handle(event)?;
        }
        ControlFlow::Continue(())
    }

    /// Blocks, handling events until a shutdown arrives.
    pub fn run(&mut self) {
        while let Ok(event) = self.events.recv() {
            if self.handle(event).is_break() {
                break;
            }
        }
    }
}

/// Handle of a running ticker thread. Dropping it stops the thread.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Sends a tick every `period` until stopped or the session goes away.
pub fn spawn_ticker(sender: EventSender, period: Duration) -> Ticker {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let handle = thread::spawn(move || {
        let mut sent = 0u64;
        while !flag.load(Ordering::Relaxed) {
            thread::sleep(period);
            if flag.load(Ordering::Relaxed) || !sender.send(ViewerEvent::Tick) {
                break;
            }
            sent += 1;
        }
        debug!("ticker stopped after {} ticks", sent);
    });
    Ticker {
        stop,
        handle: Some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::state::Mode;
    use crate::visual::{ElementId, VisualRequest};
    use evzoom_test_data::TestFile;

    fn viewer() -> Viewer {
        let data = ZoomData::from_reader(TestFile::couplings_02().bytes()).unwrap();
        let mut viewer = Viewer::new(data, ViewerConfig::default());
        viewer.mark_ready();
        viewer
    }

    #[test]
    fn test_intro_applied_on_start() {
        let session = Session::new(viewer(), Vec::<VisualRequest>::new());
        assert_eq!(session.renderer().len(), 4);
        assert!(matches!(session.renderer()[0].target, ElementId::Glyph(0)));
    }

    #[test]
    fn test_run_pending_in_order() {
        let mut session = Session::new(viewer(), Vec::<VisualRequest>::new());
        let sender = session.sender();
        // cell (1, 4) then off the plot
        assert!(sender.pointer_move(137.5, 302.5));
        assert!(sender.pointer_move(10.0, 10.0));
        assert!(session.run_pending().is_continue());
        assert_eq!(session.handled(), 2);
        assert_eq!(session.viewer().mode(), Mode::Idle);
    }

    #[test]
    fn test_shutdown_stops_pending() {
        let mut session = Session::new(viewer(), Vec::<VisualRequest>::new());
        let sender = session.sender();
        sender.send(ViewerEvent::Tick);
        sender.shutdown();
        sender.send(ViewerEvent::Tick);
        assert!(session.run_pending().is_break());
        assert_eq!(session.handled(), 2);
        assert_eq!(session.viewer().clock(), 10);
    }

    #[test]
    fn test_ticker_drives_dwell() {
        let mut session = Session::new(viewer(), Vec::<VisualRequest>::new());
        let sender = session.sender();
        sender.pointer_move(137.5, 302.5);
        let ticker = spawn_ticker(session.sender(), Duration::from_millis(1));
        let closer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(400));
            sender.shutdown();
        });
        session.run();
        ticker.stop();
        closer.join().unwrap();
        assert!(session.viewer().clock() > 0);
        // 16 ticks of 10 ms settle the match
        if session.viewer().clock() > 160 {
            assert_eq!(session.viewer().mode(), Mode::Matched);
        }
    }

    #[test]
    fn test_reload_event() {
        let mut session = Session::new(viewer(), Vec::<VisualRequest>::new());
        let data = ZoomData::from_reader(TestFile::couplings_01().bytes()).unwrap();
        let _ = session.handle(ViewerEvent::Reload { data });
        assert_eq!(session.viewer().data().len(), 30);
        // intro of the new couplings follows the old one
        assert_eq!(session.renderer().len(), 4 + 2 * 16);
    }

    #[test]
    fn test_event_json() {
        let event: ViewerEvent =
            serde_json::from_str(r#"{"event": "pointer_move", "x": 1.5, "y": 2}"#).unwrap();
        assert_eq!(event, ViewerEvent::PointerMove { x: 1.5, y: 2.0 });
        let event: ViewerEvent = serde_json::from_str(r#"{"event": "tick"}"#).unwrap();
        assert_eq!(event, ViewerEvent::Tick);
    }
}
