use crate::{Decibels, MegaHertz};

/// Per-device settings the spectrogram cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSettings {
    /// Device name as reported by the driver
    pub name: String,
    /// Tuner gain
    pub gain: Decibels,
}

/// Scan and display settings shared between the scanner, the UI and the spectrogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Lower edge of the scan
    pub start: MegaHertz,
    /// Upper edge of the scan
    pub stop: MegaHertz,
    /// Known devices
    pub devices: Vec<DeviceSettings>,
    /// Index of the active device in `devices`
    pub index: usize,
    /// Number of sweeps kept in the history and rows in the spectrogram
    pub retain_max: usize,
    /// Derive color limits from the data instead of `y_min`/`y_max`
    pub auto_scale: bool,
    /// Lower color limit
    pub y_min: f32,
    /// Upper color limit
    pub y_max: f32,
    /// Show grid lines on the main plot
    pub grid: bool,
}

impl Settings {
    /// Gain of the active device, 0 dB when no device is configured.
    pub fn gain(&self) -> Decibels {
        self.devices
            .get(self.index)
            .map(|device| device.gain)
            .unwrap_or_default()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            start: MegaHertz(87.0),
            stop: MegaHertz(108.0),
            devices: vec![DeviceSettings {
                name: "Simulated tuner".to_owned(),
                gain: Decibels(19.7),
            }],
            index: 0,
            retain_max: 40,
            auto_scale: true,
            y_min: -50.0,
            y_max: 0.0,
            grid: true,
        }
    }
}
