/// Events posted to the GUI event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The scanner stored a new sweep in the shared history.
    SweepsUpdated,
    /// The spectrogram changed and the surface should be repainted.
    Redraw,
}
