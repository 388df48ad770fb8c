// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Background execution.
//!
//! Every submitted closure runs on its own worker thread.
//! The result can be awaited, waited for, or passed to a callback.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;

use tokio::sync::oneshot;

use crate::{Error, Result};

const WORKER_NAME: &str = "svg-to-png-worker";

/// A result of a background task.
///
/// Can be `.await`ed or blocked on via [`Pending::wait`].
#[must_use = "the result is lost when `Pending` is dropped"]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> Pending<T> {
    /// Blocks the current thread until the task is finished.
    ///
    /// # Panics
    ///
    /// Panics when called inside an asynchronous execution context.
    /// Use `.await` there instead.
    pub fn wait(self) -> Result<T> {
        self.rx.blocking_recv().unwrap_or(Err(Error::Interrupted))
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(Error::Interrupted)))
    }
}

/// Runs `work` on a background thread.
pub fn submit<T, W>(work: W) -> Pending<T>
where
    T: Send + 'static,
    W: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    submit_with(work, move |res| {
        // The receiver may be gone already.
        let _ = tx.send(res);
    });

    Pending { rx }
}

/// Runs `work` on a background thread and passes its result to `callback`.
///
/// `callback` is called exactly once. On the worker thread when the thread
/// was spawned, otherwise immediately with [`Error::Interrupted`].
/// A panic inside `work` is reported as [`Error::Interrupted`] as well.
pub fn submit_with<T, W, C>(work: W, callback: C)
where
    T: Send + 'static,
    W: FnOnce() -> Result<T> + Send + 'static,
    C: FnOnce(Result<T>) + Send + 'static,
{
    // The callback has to survive a failed spawn, so it's shared with the closure.
    let slot = std::sync::Arc::new(std::sync::Mutex::new(Some(callback)));
    let worker_slot = slot.clone();

    let spawned = thread::Builder::new()
        .name(WORKER_NAME.to_string())
        .spawn(move || {
            let res = match panic::catch_unwind(AssertUnwindSafe(work)) {
                Ok(res) => res,
                Err(_) => {
                    log::warn!("A worker thread panicked.");
                    Err(Error::Interrupted)
                }
            };
            let callback = worker_slot.lock().ok().and_then(|mut c| c.take());
            if let Some(callback) = callback {
                callback(res);
            }
        });

    if let Err(e) = spawned {
        log::warn!("Failed to spawn a worker thread: {}.", e);
        let callback = slot.lock().ok().and_then(|mut c| c.take());
        if let Some(callback) = callback {
            callback(Err(Error::Interrupted));
        }
    }
}
