//! "No internet" flag shared between a client and its readers.
//!
//! The pipeline sets the flag when a request fails with a connectivity error
//! and clears it after any completed round trip. Concurrent requests race on
//! it freely: the value reflects whichever classification finished last.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Cloneable handle to a connectivity flag.
///
/// Clones observe the same flag. [`Connectivity::new`] creates an
/// independent one, which is what tests should use.
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    offline: Arc<AtomicBool>,
}

impl Connectivity {
    /// A fresh flag, initially online.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide flag used by [`RestClient::new`](super::RestClient::new).
    pub fn shared() -> Self {
        static SHARED: OnceLock<Connectivity> = OnceLock::new();
        SHARED.get_or_init(Connectivity::new).clone()
    }

    /// Whether the most recent classified failure was a connectivity error.
    pub fn no_internet(&self) -> bool {
        self.offline.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_offline(&self) {
        self.offline.store(true, Ordering::Relaxed);
    }

    pub(crate) fn mark_online(&self) {
        self.offline.store(false, Ordering::Relaxed);
    }
}
