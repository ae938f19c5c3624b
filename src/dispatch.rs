//! Callback delivery on a designated execution context.
//!
//! Collaborators complete on whatever thread their runtime happens to use. Callers
//! hand the repositories a [`Dispatcher`] so that their completion callbacks always
//! run on one known context instead.

use anyhow::{Context, Result};
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, error, trace};

use crate::TARGET_DISPATCH;

pub type Operation = Box<dyn FnOnce() + Send + 'static>;

pub trait Dispatcher: Send + Sync {
    /// Enqueue an operation. Operations run one at a time, in the order they were added.
    fn add_operation(&self, operation: Operation);
}

/// A serial queue backed by a dedicated, named thread.
///
/// A panicking operation is logged and the queue keeps draining.
/// The thread exits once every handle to the queue has been dropped and the
/// remaining operations have run.
#[derive(Clone)]
pub struct OperationQueue {
    name: String,
    sender: mpsc::UnboundedSender<Operation>,
}

impl OperationQueue {
    pub fn new(name: &str) -> Result<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Operation>();
        let thread_name = name.to_string();

        thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                debug!(target: TARGET_DISPATCH, "Operation queue {} started", thread_name);
                while let Some(operation) = receiver.blocking_recv() {
                    trace!(target: TARGET_DISPATCH, "Running operation on {}", thread_name);
                    if panic::catch_unwind(AssertUnwindSafe(operation)).is_err() {
                        error!(target: TARGET_DISPATCH, "Operation on {} panicked, continuing", thread_name);
                    }
                }
                debug!(target: TARGET_DISPATCH, "Operation queue {} stopped", thread_name);
            })
            .with_context(|| format!("Failed to spawn operation queue thread {}", name))?;

        Ok(Self {
            name: name.to_string(),
            sender,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Dispatcher for OperationQueue {
    fn add_operation(&self, operation: Operation) {
        if self.sender.send(operation).is_err() {
            error!(target: TARGET_DISPATCH, "Operation queue {} is gone, dropping operation", self.name);
        }
    }
}
