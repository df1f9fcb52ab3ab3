//! # Task Management System
//!
//! This module provides the background worker that keeps chunk meshes up to date. It is
//! deliberately small: one named thread, one work channel, one shutdown channel.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Owns the worker thread and the sending side of its shutdown channel
//! - `TaskStats`: Counters of handled and failed work items
//!
//! ## Task Lifecycle
//! 1. Producers push work items onto a `crossbeam_channel` the worker was spawned with
//! 2. The worker waits on both that channel and its shutdown channel
//! 3. Each item runs through the handler; a panic is caught, logged and counted
//! 4. The worker then waits out its throttle interval on the shutdown channel, so a
//!    shutdown request interrupts the wait immediately
//! 5. Dropping the `TaskManager` (or calling `shutdown`) disconnects the shutdown
//!    channel and joins the thread
//!
//! ## Example Usage
//! ```rust
//! use std::time::Duration;
//! use voxel_chunks::TaskManager;
//!
//! let (sender, receiver) = crossbeam_channel::unbounded::<u32>();
//! let mut worker = TaskManager::spawn("doubler", receiver, Duration::ZERO, |value| {
//!     log::info!("{}", value * 2);
//! })
//! .unwrap();
//!
//! sender.send(21).unwrap();
//! worker.shutdown();
//! ```

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{bounded, select, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info};

use crate::error::EngineError;

/// Counters describing the work a `TaskManager` has done.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Items the handler completed.
    pub processed: u64,
    /// Items whose handler panicked.
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    processed: AtomicU64,
    failed: AtomicU64,
}

/// Runs a handler over a stream of work items on a dedicated thread.
///
/// # Implementation Notes
/// - The worker exits when it is shut down or when every sender of its work channel is
///   gone
/// - Items still queued at shutdown are left on the channel
/// - Panic-safe: a panicking item is counted as failed and the loop carries on
pub struct TaskManager {
    name: String,
    shutdown_sender: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl TaskManager {
    /// Starts a worker thread.
    ///
    /// # Arguments
    /// * `name` - Thread name, also used in log output
    /// * `tasks` - The channel work items arrive on
    /// * `interval` - Pause after each item, interruptible by shutdown
    /// * `handler` - Called once per work item on the worker thread
    ///
    /// # Returns
    /// The running manager, or `EngineError::WorkerSpawn` if the OS refused the thread.
    pub fn spawn<T, F>(
        name: &str,
        tasks: Receiver<T>,
        interval: Duration,
        mut handler: F,
    ) -> Result<Self, EngineError>
    where
        T: Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let (shutdown_sender, shutdown_receiver) = bounded::<()>(1);
        let counters = Arc::new(Counters::default());
        let worker_counters = Arc::clone(&counters);
        let worker_name = name.to_string();

        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                debug!("Worker {} started", worker_name);

                loop {
                    let task = select! {
                        recv(shutdown_receiver) -> _ => None,
                        recv(tasks) -> task => task.ok(),
                    };
                    let Some(task) = task else {
                        break;
                    };

                    match panic::catch_unwind(AssertUnwindSafe(|| handler(task))) {
                        Ok(()) => {
                            worker_counters.processed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(payload) => {
                            worker_counters.failed.fetch_add(1, Ordering::Relaxed);
                            error!(
                                "Worker {} recovered from a failed task: {}",
                                worker_name,
                                panic_message(payload.as_ref())
                            );
                        }
                    }

                    match shutdown_receiver.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        _ => break,
                    }
                }

                debug!("Worker {} stopped", worker_name);
            })
            .map_err(|source| EngineError::WorkerSpawn {
                name: name.to_string(),
                source,
            })?;

        info!("Started worker {} (throttle {:?})", name, interval);

        Ok(TaskManager {
            name: name.to_string(),
            shutdown_sender: Some(shutdown_sender),
            worker: Some(worker),
            counters,
        })
    }

    /// A snapshot of the worker's counters.
    pub fn stats(&self) -> TaskStats {
        TaskStats {
            processed: self.counters.processed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Whether the worker thread is still running.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Stops the worker and waits for it to exit. Safe to call more than once.
    ///
    /// An item that is being handled when this is called runs to completion first.
    pub fn shutdown(&mut self) {
        drop(self.shutdown_sender.take());

        if let Some(worker) = self.worker.take() {
            if let Err(payload) = worker.join() {
                error!(
                    "Worker {} panicked outside a task: {}",
                    self.name,
                    panic_message(payload.as_ref())
                );
            }
            info!("Stopped worker {} ({:?})", self.name, self.stats());
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crossbeam_channel::unbounded;
    use web_time::Instant;

    use super::*;

    fn wait_for(manager: &TaskManager, handled: u64) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while manager.stats().processed + manager.stats().failed < handled {
            assert!(Instant::now() < deadline, "worker stalled at {:?}", manager.stats());
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn handles_every_item_in_order() {
        let (sender, receiver) = unbounded();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut manager = TaskManager::spawn("ordered", receiver, Duration::ZERO, move |n: u32| {
            sink.lock().unwrap().push(n);
        })
        .unwrap();

        for n in 0..20 {
            sender.send(n).unwrap();
        }
        wait_for(&manager, 20);
        manager.shutdown();

        assert_eq!(*seen.lock().unwrap(), (0..20).collect::<Vec<_>>());
        assert_eq!(manager.stats(), TaskStats { processed: 20, failed: 0 });
    }

    #[test]
    fn survives_a_panicking_item() {
        let (sender, receiver) = unbounded();
        let manager = TaskManager::spawn("panicky", receiver, Duration::ZERO, |n: u32| {
            if n == 3 {
                panic!("bad item {}", n);
            }
        })
        .unwrap();

        for n in 0..6 {
            sender.send(n).unwrap();
        }
        wait_for(&manager, 6);

        assert_eq!(manager.stats(), TaskStats { processed: 5, failed: 1 });
        assert!(manager.is_running());
    }

    #[test]
    fn shutdown_interrupts_the_throttle() {
        let (sender, receiver) = unbounded();
        let mut manager =
            TaskManager::spawn("sleepy", receiver, Duration::from_secs(60), |_: ()| {}).unwrap();

        sender.send(()).unwrap();
        wait_for(&manager, 1);

        let started = Instant::now();
        manager.shutdown();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!manager.is_running());

        // A second call is a no-op.
        manager.shutdown();
    }

    #[test]
    fn exits_when_all_senders_are_gone() {
        let (sender, receiver) = unbounded::<u8>();
        let manager = TaskManager::spawn("orphan", receiver, Duration::ZERO, |_| {}).unwrap();
        drop(sender);

        let deadline = Instant::now() + Duration::from_secs(10);
        while manager.is_running() {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn panic_messages_are_extracted() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
