use log::trace;

use crate::canvas::EguiCanvas;
use crate::control_panel::ControlPanel;
use crate::plot_view::PlotView;
use scanview_messages::Event;
use scanview_spectrogram::{ScanLock, Spectrogram};

/// Local UI state derived from scanner and spectrogram events.
pub(super) struct UiState {
    lock: ScanLock,

    pub spectrogram: Spectrogram,

    /// Spectrogram painter widget state
    pub plot_view: PlotView,

    /// Control panel widget state
    pub control_panel: ControlPanel,

    /// A new sweep arrived since the last plot
    plot_pending: bool,

    /// A repaint was requested since the last draw
    draw_pending: bool,
}

impl UiState {
    pub fn new(lock: ScanLock, spectrogram: Spectrogram, canvas: EguiCanvas) -> Self {
        Self {
            control_panel: ControlPanel::new(lock.clone(), spectrogram.clone()),
            plot_view: PlotView::new(canvas),
            lock,
            spectrogram,
            plot_pending: false,
            draw_pending: false,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::SweepsUpdated => self.plot_pending = true,
            Event::Redraw => self.draw_pending = true,
        }
    }

    /// Act on the events collected this frame, once each.
    pub fn flush(&mut self) {
        if std::mem::take(&mut self.plot_pending) {
            let snapshot = self.lock.lock().sweeps.clone();
            trace!("Plotting {} sweeps", snapshot.len());
            // Fire and forget: the plot thread requests its own redraw.
            let _ = self.spectrogram.set_plot(snapshot);
        }
        if std::mem::take(&mut self.draw_pending) {
            self.spectrogram.perform_draw();
        }
    }
}
