use std::time::{Duration, Instant};

use partscan_core::Catalog;

/// Tuning for the scan stabilizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizerConfig {
    /// Minimum time between two accepted reads.
    pub debounce: Duration,
    /// Consecutive identical normalized reads required before a code is
    /// confirmed.
    pub stability_threshold: u32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            stability_threshold: 1,
        }
    }
}

/// Lifecycle of a scanning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not yet scanning.
    Idle,
    /// Accepting decode events.
    Running,
    /// A code was confirmed or the session was stopped; further events are
    /// ignored until the next start.
    Stopped,
}

/// What a single decode event amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Dropped: session not running, inside the debounce window, or the raw
    /// text normalized to empty.
    Ignored,
    /// Tracked, still below the stability threshold.
    Pending { code: String, count: u32 },
    /// Stable read of a code the catalog does not know. Live display only;
    /// the session keeps running.
    Read { code: String },
    /// Stable read of a known code. The session stops itself.
    Confirmed { code: String },
}

/// Debounce + repeat-count filter over raw decode events.
///
/// One instance per scanning session. Tracking state mutates only through
/// `handle_decode` while Running; `stop` and `reset` discard in-progress
/// tracking, so an event arriving after stop cannot affect state.
#[derive(Debug)]
pub struct ScanSession {
    config: StabilizerConfig,
    state: SessionState,
    last_code: Option<String>,
    stable_count: u32,
    last_read: Option<Instant>,
}

impl ScanSession {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            last_code: None,
            stable_count: 0,
            last_read: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Begin accepting decode events, clearing any previous tracking.
    pub fn start(&mut self) {
        self.state = SessionState::Running;
        self.clear_tracking();
    }

    /// Stop accepting events, discarding in-progress stability tracking.
    pub fn stop(&mut self) {
        self.state = SessionState::Stopped;
        self.clear_tracking();
    }

    /// Return to Idle with all tracked fields cleared, ready for a new
    /// start.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.clear_tracking();
    }

    fn clear_tracking(&mut self) {
        self.last_code = None;
        self.stable_count = 0;
        self.last_read = None;
    }

    /// Feed one raw decode event through the debounce and stability gates.
    ///
    /// `now` is passed in so callers (and tests) control the clock. The
    /// debounce gate measures from the last *accepted* read; sub-threshold
    /// reads do not arm it.
    pub fn handle_decode(&mut self, raw: &str, now: Instant, catalog: &Catalog) -> ScanOutcome {
        if self.state != SessionState::Running {
            return ScanOutcome::Ignored;
        }

        if let Some(last) = self.last_read {
            if now.duration_since(last) < self.config.debounce {
                return ScanOutcome::Ignored;
            }
        }

        let code = catalog.canonicalize(raw);
        if code.is_empty() {
            return ScanOutcome::Ignored;
        }

        if self.last_code.as_deref() == Some(code.as_str()) {
            self.stable_count += 1;
        } else {
            self.last_code = Some(code.clone());
            self.stable_count = 1;
        }

        if self.stable_count < self.config.stability_threshold {
            return ScanOutcome::Pending {
                code,
                count: self.stable_count,
            };
        }

        self.last_read = Some(now);
        if catalog.contains(&code) {
            log::debug!("confirmed code {code}");
            self.state = SessionState::Stopped;
            ScanOutcome::Confirmed { code }
        } else {
            ScanOutcome::Read { code }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partscan_core::{CatalogRow, PartRecord};

    fn catalog() -> Catalog {
        Catalog::build([CatalogRow {
            aliases: vec!["ABC-123".to_string()],
            record: PartRecord::default(),
        }])
    }

    fn config(debounce_ms: u64, threshold: u32) -> StabilizerConfig {
        StabilizerConfig {
            debounce: Duration::from_millis(debounce_ms),
            stability_threshold: threshold,
        }
    }

    #[test]
    fn idle_session_ignores_events() {
        let catalog = catalog();
        let mut session = ScanSession::new(StabilizerConfig::default());
        assert_eq!(
            session.handle_decode("abc-123", Instant::now(), &catalog),
            ScanOutcome::Ignored
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn known_code_confirms_and_stops() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(100, 1));
        session.start();
        let outcome = session.handle_decode("abc-123", Instant::now(), &catalog);
        assert_eq!(
            outcome,
            ScanOutcome::Confirmed {
                code: "ABC123".to_string()
            }
        );
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn events_after_confirmation_are_ignored() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(0, 1));
        session.start();
        let t0 = Instant::now();
        assert!(matches!(
            session.handle_decode("ABC123", t0, &catalog),
            ScanOutcome::Confirmed { .. }
        ));
        // Same code again, well outside any debounce window.
        assert_eq!(
            session.handle_decode("ABC123", t0 + Duration::from_secs(5), &catalog),
            ScanOutcome::Ignored
        );
    }

    #[test]
    fn debounce_drops_events_inside_the_window() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(100, 1));
        session.start();
        let t0 = Instant::now();

        // Unknown code: accepted read, session keeps running.
        assert_eq!(
            session.handle_decode("ZZZ999", t0, &catalog),
            ScanOutcome::Read {
                code: "ZZZ999".to_string()
            }
        );
        // 50 ms later: inside the window, dropped with no state change.
        assert_eq!(
            session.handle_decode("ZZZ999", t0 + Duration::from_millis(50), &catalog),
            ScanOutcome::Ignored
        );
        // 150 ms later: accepted again.
        assert_eq!(
            session.handle_decode("ZZZ999", t0 + Duration::from_millis(150), &catalog),
            ScanOutcome::Read {
                code: "ZZZ999".to_string()
            }
        );
    }

    #[test]
    fn two_fast_reads_confirm_once() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(100, 1));
        session.start();
        let t0 = Instant::now();

        assert!(matches!(
            session.handle_decode("ABC123", t0, &catalog),
            ScanOutcome::Confirmed { .. }
        ));
        assert_eq!(
            session.handle_decode("ABC123", t0 + Duration::from_millis(10), &catalog),
            ScanOutcome::Ignored
        );
    }

    #[test]
    fn threshold_requires_consecutive_matching_reads() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(0, 3));
        session.start();
        let t0 = Instant::now();

        assert_eq!(
            session.handle_decode("ABC123", t0, &catalog),
            ScanOutcome::Pending {
                code: "ABC123".to_string(),
                count: 1
            }
        );
        assert_eq!(
            session.handle_decode("abc-123", t0, &catalog),
            ScanOutcome::Pending {
                code: "ABC123".to_string(),
                count: 2
            }
        );
        assert_eq!(
            session.handle_decode("ABC123", t0, &catalog),
            ScanOutcome::Confirmed {
                code: "ABC123".to_string()
            }
        );
    }

    #[test]
    fn differing_read_resets_the_counter() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(0, 3));
        session.start();
        let t0 = Instant::now();

        session.handle_decode("ABC123", t0, &catalog);
        session.handle_decode("ABC123", t0, &catalog);
        // Different code: counter restarts at 1 for the new code.
        assert_eq!(
            session.handle_decode("XYZ", t0, &catalog),
            ScanOutcome::Pending {
                code: "XYZ".to_string(),
                count: 1
            }
        );
        // The original code also restarts from 1.
        assert_eq!(
            session.handle_decode("ABC123", t0, &catalog),
            ScanOutcome::Pending {
                code: "ABC123".to_string(),
                count: 1
            }
        );
    }

    #[test]
    fn empty_normalized_reads_are_ignored() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(0, 1));
        session.start();
        assert_eq!(
            session.handle_decode(" - ", Instant::now(), &catalog),
            ScanOutcome::Ignored
        );
    }

    #[test]
    fn stop_discards_tracking() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(0, 2));
        session.start();
        let t0 = Instant::now();

        session.handle_decode("ABC123", t0, &catalog);
        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(session.handle_decode("ABC123", t0, &catalog), ScanOutcome::Ignored);

        // A fresh start counts from scratch.
        session.start();
        assert_eq!(
            session.handle_decode("ABC123", t0, &catalog),
            ScanOutcome::Pending {
                code: "ABC123".to_string(),
                count: 1
            }
        );
    }

    #[test]
    fn reset_returns_to_idle() {
        let catalog = catalog();
        let mut session = ScanSession::new(config(0, 1));
        session.start();
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(
            session.handle_decode("ABC123", Instant::now(), &catalog),
            ScanOutcome::Ignored
        );
    }
}
