use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Instant;

use crate::error::ScanError;

/// One raw decode event from the engine.
#[derive(Debug, Clone)]
pub struct DecodeEvent {
    /// Raw decoded text, un-normalized.
    pub code: String,
    /// When the engine produced the event.
    pub at: Instant,
}

/// An external barcode decoding engine.
///
/// `start` acquires the input and hands back the event stream; `stop` tells
/// the engine to stop producing. Dropping the receiver also ends the
/// subscription, so a consumer that walked away never sees late events.
pub trait DecodeEngine {
    fn start(&mut self) -> Result<Receiver<DecodeEvent>, ScanError>;
    fn stop(&mut self);
}

/// Decode engine over line-based input.
///
/// Keyboard-wedge barcode readers present each scan as a line of text, which
/// also makes stdin a usable engine for the CLI. Reads on a background
/// thread; `stop` raises a flag checked before each send.
pub struct LineEngine<R> {
    input: Option<R>,
    stopped: Arc<AtomicBool>,
}

impl<R: BufRead + Send + 'static> LineEngine<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Some(input),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<R: BufRead + Send + 'static> DecodeEngine for LineEngine<R> {
    fn start(&mut self) -> Result<Receiver<DecodeEvent>, ScanError> {
        let input = self
            .input
            .take()
            .ok_or_else(|| ScanError::CameraInit("decode input already consumed".to_string()))?;
        let stopped = Arc::clone(&self.stopped);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for line in input.lines() {
                if stopped.load(Ordering::SeqCst) {
                    break;
                }
                let code = match line {
                    Ok(code) => code,
                    Err(e) => {
                        log::warn!("decode input error: {e}");
                        break;
                    }
                };
                let event = DecodeEvent {
                    code,
                    at: Instant::now(),
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}
