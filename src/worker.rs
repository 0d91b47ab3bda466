//! Background fetch workers.
//!
//! A widget that talks to a slow data source hands the call to a [`Worker`].
//! Each job runs on its own named thread and sends its result back over a
//! channel owned by the widget; the main loop picks results up with
//! [`Worker::take_latest`] on its next pass. Once the widget shuts its worker
//! down the receiver is gone, so late results are silently dropped.
//!
//! Jobs are numbered as they are spawned. A result older than one already
//! handed out is discarded, so a slow fetch never overwrites fresher data.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::logger::{Log, LogLevel};

pub struct Worker<T> {
    name: &'static str,
    sender: Sender<(u64, T)>,
    receiver: Option<Receiver<(u64, T)>>,
    pending: usize,
    next_job: u64,
    newest_taken: u64,
}

impl<T: Send + 'static> Worker<T> {
    pub fn new(name: &'static str) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            name,
            sender,
            receiver: Some(receiver),
            pending: 0,
            next_job: 1,
            newest_taken: 0,
        }
    }

    /// Run `job` on a background thread. Returns false if the worker is shut
    /// down or the thread could not be spawned.
    pub fn spawn<F>(&mut self, job: F) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self.receiver.is_none() {
            return false;
        }

        let sender = self.sender.clone();
        let job_id = self.next_job;
        let spawned = thread::Builder::new()
            .name(format!("{}-fetch", self.name))
            .spawn(move || {
                // The receiver may be gone by now; nothing to do then.
                let _ = sender.send((job_id, job()));
            });

        match spawned {
            Ok(_) => {
                self.next_job += 1;
                self.pending += 1;
                true
            }
            Err(e) => {
                Log::log_widget(
                    LogLevel::Err,
                    self.name,
                    &format!("Failed to start background fetch: {}", e),
                );
                false
            }
        }
    }

    /// Drain every finished result and return the one from the most recently
    /// spawned job. Results older than anything already returned are dropped.
    pub fn take_latest(&mut self) -> Option<T> {
        let receiver = self.receiver.as_ref()?;
        let mut latest: Option<(u64, T)> = None;
        loop {
            match receiver.try_recv() {
                Ok((job_id, result)) => {
                    self.pending = self.pending.saturating_sub(1);
                    let newest_so_far = latest.as_ref().map_or(self.newest_taken, |(id, _)| *id);
                    if job_id > newest_so_far {
                        latest = Some((job_id, result));
                    } else {
                        Log::log_widget(LogLevel::Log, self.name, "Dropped stale fetch result");
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        let (job_id, result) = latest?;
        self.newest_taken = job_id;
        Some(result)
    }

    /// Jobs spawned whose result has not been picked up yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Stop accepting jobs and discard any results still in flight.
    pub fn shutdown(&mut self) {
        self.receiver = None;
        self.pending = 0;
    }
}
