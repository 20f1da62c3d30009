//! Ctrl+C handling.
//!
//! The first Ctrl+C sets a shared flag. The tree walker reads it before
//! entering each directory, so the directory in hand is always finished,
//! the summary is still emitted, and the process exits with code 130.
//!
//! ```rust,no_run
//! use dirdedup::report::LogSink;
//! use dirdedup::scanner::{TreeWalker, WalkerConfig};
//! use dirdedup::signal::install_handler;
//! use std::path::Path;
//!
//! let handler = install_handler();
//! let stats = TreeWalker::new(Path::new("."), WalkerConfig::default())
//!     .with_shutdown_flag(handler.get_flag())
//!     .run(&LogSink)
//!     .unwrap();
//! assert_eq!(stats.interrupted, handler.is_shutdown_requested());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// A cancellation flag shared between the Ctrl+C hook and the walker.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// A handler that has not been triggered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stop was requested since the last [`reset`](Self::reset).
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Ask the walker to stop before its next directory.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// The raw flag, for [`TreeWalker::with_shutdown_flag`].
    ///
    /// [`TreeWalker::with_shutdown_flag`]: crate::scanner::TreeWalker::with_shutdown_flag
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear a previous request.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Hook Ctrl+C to the process-wide handler and return it, cleared.
///
/// ctrlc accepts one hook per process, so the hook is registered on the
/// first call only; later calls (several `run_app` runs in one test binary)
/// get the same handler back with its flag reset. When the hook cannot be
/// registered the handler still works through
/// [`ShutdownHandler::request_shutdown`].
pub fn install_handler() -> ShutdownHandler {
    let handler = GLOBAL_HANDLER.get_or_init(|| {
        let handler = ShutdownHandler::new();
        let flag = handler.get_flag();
        let hooked = ctrlc::set_handler(move || {
            if !flag.swap(true, Ordering::SeqCst) {
                eprintln!("\nInterrupted, stopping after the current directory");
                log::info!("Shutdown requested");
            }
        });
        if let Err(e) = hooked {
            log::debug!("Ctrl+C not hooked: {}", e);
        }
        handler
    });
    handler.reset();
    handler.clone()
}
