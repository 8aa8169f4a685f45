/// Commands sent from the UI to the scanner.
#[derive(Debug)]
pub enum Command {
    /// Stop scanning and let the scanner thread exit.
    Stop,
}
