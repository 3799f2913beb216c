use partscan_core::PartRecord;

/// UI regions toggled as a session moves through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanView {
    /// Scanner not running; offer to start.
    Start,
    /// Live scanning in progress.
    Scanning,
    /// A code was confirmed; offer a rescan.
    Rescan,
}

/// Presentation sink for scan sessions and lookups.
///
/// The pipeline never renders; it pushes load status, the live-decoded code,
/// and lookup results through this seam. The CLI ships a terminal
/// implementation.
pub trait Presenter {
    /// Catalog load status line ("loaded", "error", timestamp).
    fn load_status(&mut self, text: &str);

    /// Switch the visible UI region.
    fn show_view(&mut self, view: ScanView);

    /// Latest stable decoded code for the live display.
    fn live_code(&mut self, code: &str);

    /// Render a matched record.
    fn show_match(&mut self, code: &str, record: &PartRecord);

    /// Render the invalid/not-found indicator.
    fn show_not_found(&mut self, code: &str);
}
