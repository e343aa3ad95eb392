//! Background expiry sweeper: a dedicated thread driven by a command channel.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

/// Commands accepted by the sweeper thread.
#[derive(Debug)]
pub(crate) enum SweepCommand {
    /// Sweep immediately instead of waiting for the next tick.
    SweepNow,
    Shutdown,
}

/// Handle to the sweeper thread. Dropping it stops and joins the thread.
pub(crate) struct Sweeper {
    tx: Sender<SweepCommand>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawn a thread calling `sweep` every `interval`.
    ///
    /// Returns `None` if the thread cannot be spawned; expiry-on-read keeps
    /// the cache correct without it.
    pub(crate) fn spawn<F>(interval: Duration, sweep: F) -> Option<Self>
    where
        F: Fn() -> usize + Send + 'static,
    {
        let (tx, rx) = bounded::<SweepCommand>(16);
        let spawned = std::thread::Builder::new()
            .name("weave-cache-sweeper".to_string())
            .spawn(move || loop {
                match rx.recv_timeout(interval) {
                    Ok(SweepCommand::SweepNow) | Err(RecvTimeoutError::Timeout) => {
                        sweep();
                    }
                    Ok(SweepCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        match spawned {
            Ok(handle) => Some(Self {
                tx,
                handle: Some(handle),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "failed to spawn cache sweeper, relying on lazy expiry");
                None
            }
        }
    }

    pub(crate) fn request_sweep(&self) {
        let _ = self.tx.try_send(SweepCommand::SweepNow);
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        let _ = self.tx.send(SweepCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
