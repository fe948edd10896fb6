//! Loading flags.
//!
//! A flag is raised for the duration of a request and lowered by an RAII
//! guard, so it returns to idle on every exit path including `?` and panics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Observable state of a [`LoadingFlag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Idle,
    Loading,
}

/// A loading indicator shared between a page and whoever renders it.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    /// A new idle flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag until the returned guard is dropped.
    #[must_use = "the flag is lowered as soon as the guard is dropped"]
    pub fn begin(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(Arc::clone(&self.0))
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LoadingState {
        if self.0.load(Ordering::SeqCst) {
            LoadingState::Loading
        } else {
            LoadingState::Idle
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state() == LoadingState::Loading
    }
}

/// Lowers its [`LoadingFlag`] on drop.
#[derive(Debug)]
pub struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_idle() {
        assert_eq!(LoadingFlag::new().state(), LoadingState::Idle);
    }

    #[test]
    fn test_guard_lowers_flag_on_drop() {
        let flag = LoadingFlag::new();
        let observer = flag.clone();
        {
            let _guard = flag.begin();
            assert!(observer.is_loading());
        }
        assert_eq!(observer.state(), LoadingState::Idle);
    }

    #[test]
    fn test_guard_lowers_flag_on_early_return() {
        fn fails(flag: &LoadingFlag) -> Result<(), &'static str> {
            let _guard = flag.begin();
            let response: Result<u32, &'static str> = Err("boom");
            response?;
            Ok(())
        }

        let flag = LoadingFlag::new();
        assert!(fails(&flag).is_err());
        assert!(!flag.is_loading());
    }
}
