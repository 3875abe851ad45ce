//! Timeout, retry and fallback wrappers for extraction work.
//!
//! Real-world pages occasionally hit pathological paths: a quadratic
//! selector on a ten-megabyte page, a flaky upstream producing truncated
//! HTML. These combinators bound the damage without threading deadline
//! state through every pass.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::warn;

use crate::error::{Error, Result};

/// Base delay for retry backoff; attempt `n` waits `BASE * 2^n`.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Run `f` on a worker thread, waiting at most `limit` for its result.
///
/// On timeout the worker is abandoned, not killed: it keeps running until
/// its own completion, but its result is discarded. Callers should make
/// sure `f` does not hold locks the caller will want afterwards.
pub fn with_timeout<T, F>(limit: Duration, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver may be gone if the deadline already passed.
        let _ = tx.send(f());
    });
    match rx.recv_timeout(limit) {
        Ok(value) => Ok(value),
        Err(RecvTimeoutError::Timeout) => {
            warn!("worker abandoned after {limit:?} deadline");
            Err(Error::Timeout(limit))
        }
        Err(RecvTimeoutError::Disconnected) => {
            // The worker panicked before sending.
            Err(Error::WorkerFailed("worker terminated without a result".into()))
        }
    }
}

/// Run `f`, retrying up to `retries` additional times with exponential
/// backoff between tries. `retries == 0` means a single call, no retry.
///
/// The first failure retries after 100ms, the next after 200ms, doubling
/// each time. Once the initial call and every retry have failed, the last
/// error is wrapped in [`Error::RetriesExhausted`] carrying the total
/// number of calls made.
pub fn with_retry<T, F>(retries: usize, mut f: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let total = retries.saturating_add(1);
    let mut last: Option<Error> = None;
    for attempt in 0..total {
        if attempt > 0 {
            let delay = RETRY_BASE_DELAY * 2_u32.saturating_pow(
                u32::try_from(attempt - 1).unwrap_or(u32::MAX),
            );
            thread::sleep(delay);
        }
        match f() {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!("attempt {} of {total} failed: {err}", attempt + 1);
                last = Some(err);
            }
        }
    }
    let source = last.unwrap_or_else(|| {
        Error::Structure("retry loop produced no error".into())
    });
    Err(Error::RetriesExhausted {
        attempts: total,
        source: Box::new(source),
    })
}

/// Run `primary`; on failure run `fallback`.
///
/// A fallback success still reports the primary's error so callers can log
/// the degradation. If both fail, the result is
/// [`Error::ExhaustedFallback`] describing both errors.
pub fn with_fallback<T, P, S>(primary: P, fallback: S) -> Result<(T, Option<Error>)>
where
    P: FnOnce() -> Result<T>,
    S: FnOnce() -> Result<T>,
{
    match primary() {
        Ok(value) => Ok((value, None)),
        Err(primary_err) => match fallback() {
            Ok(value) => {
                warn!("primary path failed, fallback succeeded: {primary_err}");
                Ok((value, Some(primary_err)))
            }
            Err(fallback_err) => Err(Error::ExhaustedFallback(format!(
                "primary: {primary_err}; fallback: {fallback_err}"
            ))),
        },
    }
}
