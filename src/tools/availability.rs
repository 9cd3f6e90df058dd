//! Tool availability checks.
//!
//! Answers "is executable X on the search path?" once per name per run.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Something that can tell whether an executable is installed.
///
/// Implementations must be safe to share between worker threads.
pub trait ToolOracle: Send + Sync {
    fn is_available(&self, program: &str) -> bool;
}

/// Looks executables up on `PATH`, caching each answer for the lifetime of
/// the oracle.
///
/// Two threads asking about the same uncached name may both perform the
/// lookup; the cache itself is always consistent.
#[derive(Debug, Default)]
pub struct PathOracle {
    cache: Mutex<HashMap<String, bool>>,
}

impl PathOracle {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lookup(program: &str) -> bool {
        match which::which(program) {
            Ok(path) => {
                log::debug!("Tool '{program}' found at {}", path.display());
                true
            }
            Err(e) => {
                log::debug!("Tool '{program}' not found: {e}");
                false
            }
        }
    }
}

impl ToolOracle for PathOracle {
    fn is_available(&self, program: &str) -> bool {
        {
            let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(&available) = cache.get(program) {
                return available;
            }
        }

        // Lookup runs outside the lock so slow PATH scans don't serialize workers
        let available = Self::lookup(program);

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(program.to_string(), available);

        available
    }
}

/// An oracle with a fixed answer set. Everything not listed is unavailable.
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    available: HashSet<String>,
}

impl StaticOracle {
    pub fn new<I, S>(programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: programs.into_iter().map(Into::into).collect(),
        }
    }
}

impl ToolOracle for StaticOracle {
    fn is_available(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}
