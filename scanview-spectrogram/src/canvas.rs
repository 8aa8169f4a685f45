use crate::error::SpectrogramError;
use crate::figure::{ColorBar, Figure};

/// Paint backend for a [`Figure`].
///
/// Every call is made while the scan lock is held, so implementations see a
/// consistent figure and must not block on the GUI thread.
pub trait Canvas: Send + Sync {
    /// Fit the layout (label margins and the like) to the figure.
    fn tight_layout(&self, figure: &Figure) -> Result<(), SpectrogramError>;

    /// Paint the whole figure.
    fn draw(&self, figure: &Figure) -> Result<(), SpectrogramError>;

    /// Repaint only the legend color bar.
    fn draw_colorbar(&self, colorbar: &ColorBar) -> Result<(), SpectrogramError>;

    /// Drop everything painted so far.
    fn clear(&self);
}
