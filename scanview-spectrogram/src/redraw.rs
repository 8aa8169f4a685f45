use std::thread;

use flume::{Sender, TrySendError};
use log::{debug, trace, warn};
use scanview_messages::Event;

use crate::spectrogram::Spectrogram;

/// How a repaint request reaches the painter without blocking the caller.
pub trait RedrawStrategy: Send + Sync {
    fn request(&self, view: &Spectrogram);
}

/// Paint on a short-lived worker thread.
#[derive(Debug, Default)]
pub struct WorkerRedraw;

impl RedrawStrategy for WorkerRedraw {
    fn request(&self, view: &Spectrogram) {
        let view = view.clone();
        if let Err(e) = thread::Builder::new()
            .name("draw".to_owned())
            .spawn(move || view.perform_draw())
        {
            warn!("Failed to spawn draw thread: {e}");
        }
    }
}

/// Post [`Event::Redraw`] to the event loop, which then calls
/// [`Spectrogram::perform_draw`] itself.
#[derive(Debug)]
pub struct NotifyRedraw {
    notify: Sender<Event>,
}

impl NotifyRedraw {
    pub fn new(notify: Sender<Event>) -> Self {
        Self { notify }
    }
}

impl RedrawStrategy for NotifyRedraw {
    fn request(&self, _view: &Spectrogram) {
        match self.notify.try_send(Event::Redraw) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                trace!("Event queue full, dropping redraw request");
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("Event loop is gone, dropping redraw request");
            }
        }
    }
}

/// Worker threads on Windows, event loop notifications elsewhere.
pub fn platform_redraw(notify: Sender<Event>) -> Box<dyn RedrawStrategy> {
    if cfg!(windows) {
        Box::new(WorkerRedraw)
    } else {
        Box::new(NotifyRedraw::new(notify))
    }
}
