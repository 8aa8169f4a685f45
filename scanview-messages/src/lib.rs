mod command;
mod event;
mod settings;
mod sweep;
mod units;

pub use command::Command;
pub use event::Event;
pub use settings::{DeviceSettings, Settings};
pub use sweep::{Sweep, SweepHistory, Timestamp};
pub use units::{Decibels, MegaHertz};
