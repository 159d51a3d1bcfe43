use super::error::GatewayError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Gateway-wide loading indicator and last error message.
///
/// Starting an operation clears the previous error; a failure records its
/// message until the next operation starts.
#[derive(Debug, Default)]
pub struct GatewayStatus {
    in_flight: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

/// Decrements the in-flight count when the operation settles or is dropped.
pub(crate) struct InFlight<'a> {
    status: &'a GatewayStatus,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.status.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl GatewayStatus {
    pub(crate) fn begin(&self) -> InFlight<'_> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = None;
        InFlight { status: self }
    }

    pub(crate) fn record_error(&self, err: &GatewayError) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(err.to_string());
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
