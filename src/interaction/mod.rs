//! Terminal interaction.
//!
//! The command only ever shows a progress spinner while the API works; it is kept behind
//! [`SpinnerInteraction`] so tests can run without a terminal.
use anyhow::Result;

mod spinner;

#[derive(Debug, Default, Clone)]
pub struct Interaction;

impl Interaction {
    pub fn new() -> Self {
        Default::default()
    }
}

/// Stops its spinner when dropped.
pub struct SpinnerHandle {
    stop_spinner: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl SpinnerHandle {
    pub fn new(stop_spinner: Box<dyn FnOnce() + Send + Sync>) -> Self {
        Self {
            stop_spinner: Some(stop_spinner),
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        if let Some(stop_spinner) = self.stop_spinner.take() {
            stop_spinner();
        }
    }
}

pub trait SpinnerInteraction {
    fn start_spinner(&self, message: String) -> Result<SpinnerHandle>;
}


#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use super::*;

    #[test]
    fn test_spinner_handle_stops_on_drop() {
        let stopped = Arc::new(AtomicBool::new(false));
        let stopped_clone = stopped.clone();

        let handle = SpinnerHandle::new(Box::new(move || {
            stopped_clone.store(true, Ordering::SeqCst);
        }));
        assert!(!stopped.load(Ordering::SeqCst));

        drop(handle);
        assert!(stopped.load(Ordering::SeqCst));
    }
}
