use scanview_messages::{Command, MegaHertz, Settings};
use scanview_scanner::Scanner;
use scanview_spectrogram::Scan;

use log::{LevelFilter, info, warn};
use std::io::Write;

/// Build settings from `scanview [START_MHZ STOP_MHZ [RETAIN]]`.
///
/// Anything unparsable falls back to the defaults with a warning.
fn settings_from_args(args: &[String]) -> Settings {
    let mut settings = Settings::default();

    match args {
        [] => {}
        [start, stop, rest @ ..] => {
            match (start.parse::<f64>(), stop.parse::<f64>()) {
                (Ok(start), Ok(stop)) if start < stop => {
                    settings.start = MegaHertz(start);
                    settings.stop = MegaHertz(stop);
                }
                _ => warn!(
                    "Invalid scan range {start} - {stop}, using {} - {} MHz",
                    settings.start, settings.stop
                ),
            }
            if let Some(retain) = rest.first() {
                match retain.parse::<usize>() {
                    Ok(retain) if retain > 0 => settings.retain_max = retain,
                    _ => warn!(
                        "Invalid retain count {retain}, using {}",
                        settings.retain_max
                    ),
                }
            }
        }
        [single] => warn!("Ignoring lone argument {single}, expected START_MHZ STOP_MHZ"),
    }

    settings
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} - mod path |{}| - target | {} | args: |{}|",
                record.level(),
                record.module_path().unwrap_or(""),
                record.target(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Debug)
        .filter_module("eframe", LevelFilter::Warn)
        .filter_module("egui_winit", LevelFilter::Warn)
        .filter_module("scanview_scanner", LevelFilter::Info)
        .filter_module("scanview_spectrogram", LevelFilter::Debug)
        .filter_module("scanview_ui", LevelFilter::Trace)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = settings_from_args(&args);
    info!(
        "Scanning {} - {} MHz, keeping {} sweeps",
        settings.start, settings.stop, settings.retain_max
    );

    // Settings, sweep history and figure behind one lock
    let lock = Scan::new(settings).into_lock();

    // Commands to the scanner; sweep and redraw events to the UI
    let (cmd_tx, cmd_rx) = flume::unbounded();
    let (event_tx, event_rx) = flume::unbounded();

    // Spawn scanner thread
    let scanner = Scanner::new(cmd_rx, event_tx.clone(), lock.clone());
    let scanner_handle = std::thread::Builder::new()
        .name("scanner".to_owned())
        .spawn(move || scanner.run())?;

    // Run UI on main thread (blocking)
    let ui_result = scanview_ui::run(lock, event_rx, event_tx);

    // UI has exited - send stop command to scanner
    let _ = cmd_tx.send(Command::Stop);

    // Wait for scanner thread to finish
    scanner_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Scanner thread panicked"))??;

    ui_result
}
