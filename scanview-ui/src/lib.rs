mod canvas;
mod control_panel;
mod plot_view;
mod state;

use std::time::Duration;

use scanview_messages::Event;
use scanview_spectrogram::{ScanLock, Spectrogram, platform_redraw};

pub use canvas::{EguiCanvas, Margins, Rendered};
use state::UiState;

/// How often the event loop wakes to look for scanner events.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application struct implementing the egui App trait.
pub struct ScanviewApp {
    /// Receiver for scanner and redraw events
    event_rx: flume::Receiver<Event>,

    /// Local application state
    state: UiState,
}

impl ScanviewApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        lock: ScanLock,
        event_rx: flume::Receiver<Event>,
        event_tx: flume::Sender<Event>,
    ) -> Self {
        let canvas = EguiCanvas::new(cc.egui_ctx.clone());
        let spectrogram = Spectrogram::new(lock.clone(), canvas.clone(), platform_redraw(event_tx));
        spectrogram.initialize();
        Self {
            event_rx,
            state: UiState::new(lock, spectrogram, canvas),
        }
    }
}

impl eframe::App for ScanviewApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        // Pull every pending event, then act on them once
        while let Ok(event) = self.event_rx.try_recv() {
            self.state.handle_event(event);
        }
        self.state.flush();

        ctx.request_repaint_after(EVENT_POLL_INTERVAL);

        // Right side panel for controls
        eframe::egui::SidePanel::right("control_panel")
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.add(&mut self.state.control_panel);
            });

        // Central panel for the spectrogram
        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(&mut self.state.plot_view);
        });
    }
}

impl Drop for ScanviewApp {
    fn drop(&mut self) {
        self.state.spectrogram.close();
    }
}

/// Entry point for the UI module.
///
/// Runs the eframe application on the main thread (blocking). `event_tx` is
/// the sending side of `event_rx`, used for redraw notifications.
pub fn run(
    lock: ScanLock,
    event_rx: flume::Receiver<Event>,
    event_tx: flume::Sender<Event>,
) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_title("scanview"),
        ..Default::default()
    };

    eframe::run_native(
        "scanview",
        options,
        Box::new(move |cc| Ok(Box::new(ScanviewApp::new(cc, lock, event_rx, event_tx)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
