//! UI presentation options, resolved from config.

/// Rendering options threaded through the TUI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    /// Use ASCII-only glyphs for icons and markers.
    pub ascii_only: bool,
    /// Use a high-contrast color palette.
    pub high_contrast: bool,
    /// Disable the countdown pulse and other motion.
    pub reduced_motion: bool,
}
