use eframe::egui::{Checkbox, DragValue, Response, Ui, Widget};

use scanview_spectrogram::{ScanLock, Spectrogram};

/// Control panel widget for the display settings.
///
/// Settings are read from the shared scan state every frame and written
/// back immediately, so the panel never holds stale copies.
pub struct ControlPanel {
    lock: ScanLock,
    spectrogram: Spectrogram,
}

impl ControlPanel {
    pub fn new(lock: ScanLock, spectrogram: Spectrogram) -> Self {
        Self { lock, spectrogram }
    }

    fn set_grid(&self, on: bool) {
        self.lock.lock().settings.grid = on;
        self.spectrogram.set_grid(on);
    }

    fn set_auto_scale(&self, on: bool) {
        self.lock.lock().settings.auto_scale = on;
        self.rescale(false);
    }

    fn set_limits(&self, y_min: f32, y_max: f32) {
        {
            let mut scan = self.lock.lock();
            scan.settings.y_min = y_min;
            scan.settings.y_max = y_max;
        }
        self.rescale(false);
    }

    fn rescale(&self, force: bool) {
        self.spectrogram.scale_plot(force);
        self.spectrogram.redraw_plot();
    }
}

impl Widget for &mut ControlPanel {
    fn ui(self, ui: &mut Ui) -> Response {
        let settings = self.lock.lock().settings.clone();

        ui.heading("Display");
        ui.separator();

        let mut grid = settings.grid;
        if ui.add(Checkbox::new(&mut grid, "Grid")).changed() {
            self.set_grid(grid);
        }

        let mut auto_scale = settings.auto_scale;
        if ui.add(Checkbox::new(&mut auto_scale, "Auto scale")).changed() {
            self.set_auto_scale(auto_scale);
        }

        ui.add_space(10.0);

        // Manual limits, only editable when not auto scaling
        let (mut y_min, mut y_max) = (settings.y_min, settings.y_max);
        let mut limits_changed = false;
        ui.add_enabled_ui(!settings.auto_scale, |ui| {
            ui.horizontal(|ui| {
                ui.label("Level min:");
                limits_changed |= ui
                    .add(DragValue::new(&mut y_min).speed(0.5).suffix(" dB"))
                    .changed();
            });
            ui.horizontal(|ui| {
                ui.label("Level max:");
                limits_changed |= ui
                    .add(DragValue::new(&mut y_max).speed(0.5).suffix(" dB"))
                    .changed();
            });
        });
        if limits_changed && y_min < y_max {
            self.set_limits(y_min, y_max);
        }

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.label("History:");
            let mut retain = settings.retain_max;
            if ui
                .add(DragValue::new(&mut retain).range(1..=1000).suffix(" sweeps"))
                .changed()
            {
                self.lock.lock().settings.retain_max = retain;
            }
        });

        ui.add_space(10.0);
        ui.separator();

        if ui.button("Rescale").clicked() {
            self.rescale(true);
        }

        ui.label(format!(
            "{} - {} MHz, gain {} dB",
            settings.start,
            settings.stop,
            settings.gain()
        ));
        let suppressed = self.spectrogram.suppressed_failures();
        if suppressed > 0 {
            ui.label(format!("Dropped frames: {suppressed}"));
        }

        ui.response()
    }
}
