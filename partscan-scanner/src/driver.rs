use std::sync::mpsc::{Receiver, TryRecvError};

use partscan_core::{Catalog, LookupResult};

use crate::engine::DecodeEvent;
use crate::presenter::{Presenter, ScanView};
use crate::session::{ScanOutcome, ScanSession};

/// Discard decode events already queued on the stream.
///
/// Call before re-entering `run_session` for a rescan: reads that landed
/// between sessions belong to no session and must not leak into the next
/// one.
pub fn drain(events: &Receiver<DecodeEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => log::debug!("discarding stale decode event {:?}", event.code),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
}

/// Drive one scanning session over a decode-event stream.
///
/// Starts the session and feeds the stream through the stabilizer until a
/// code is confirmed or the stream ends. Stable reads go to the live
/// display; on confirmation the matched record is rendered, the presenter
/// switches to the rescan view, and the confirmed code is returned. A stream
/// that ends without a confirmation stops the session and returns `None`.
pub fn run_session(
    events: &Receiver<DecodeEvent>,
    session: &mut ScanSession,
    catalog: &Catalog,
    presenter: &mut dyn Presenter,
) -> Option<String> {
    session.start();
    presenter.show_view(ScanView::Scanning);

    while let Ok(event) = events.recv() {
        match session.handle_decode(&event.code, event.at, catalog) {
            ScanOutcome::Ignored => {}
            ScanOutcome::Pending { code, count } => {
                log::trace!("tracking {code} ({count})");
            }
            ScanOutcome::Read { code } => {
                presenter.live_code(&code);
            }
            ScanOutcome::Confirmed { code } => {
                presenter.live_code(&code);
                match catalog.lookup(&code) {
                    LookupResult::Match { code, record } => {
                        presenter.show_match(&code, &record);
                    }
                    // A confirmed code is a catalog member by construction;
                    // this arm keeps the presenter honest anyway.
                    LookupResult::NotFound { code } => {
                        presenter.show_not_found(&code);
                    }
                }
                presenter.show_view(ScanView::Rescan);
                return Some(code);
            }
        }
    }

    session.stop();
    None
}
