//! Timer-driven periodic commands.
//!
//! Widgets that need a recurring callback (blinking cursors, progress
//! polling, fading scroll indicators) register a command under their own id.
//! A timer thread posts every registered command once per interval into a
//! channel, and the UI thread drains that channel and dispatches the
//! commands like any other.
//!
//! The registry is the only part of the widget core shared across threads,
//! so it is guarded by a mutex. Dispatch never happens on the timer thread.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use trellis_core::periodic::Periodic;
//! # use slotmap::SlotMap;
//! # let mut ids: SlotMap<trellis_core::WidgetId, ()> = SlotMap::with_key();
//! # let cursor = ids.insert(());
//!
//! let periodic = Periodic::new();
//! periodic.add(cursor, "cursor.blink");
//!
//! // Normally done by the timer thread started with `start_timer`.
//! periodic.post_all();
//! assert_eq!(periodic.drain(), vec!["cursor.blink".to_string()]);
//! ```

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use parking_lot::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::id::WidgetId;
use crate::logging::targets;

/// Default interval between periodic posts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct PeriodicCommand {
    context: WidgetId,
    command: String,
}

#[derive(Debug, Default)]
struct Registry {
    /// Sorted by context.
    commands: Vec<PeriodicCommand>,
}

impl Registry {
    fn locate(&self, context: WidgetId) -> Result<usize, usize> {
        self.commands.binary_search_by(|pc| pc.context.cmp(&context))
    }
}

/// Shared handle to a periodic-command registry.
///
/// Cloning the handle shares the registry and the delivery channel.
#[derive(Debug, Clone)]
pub struct Periodic {
    registry: Arc<Mutex<Registry>>,
    sender: Sender<String>,
    receiver: Receiver<String>,
}

impl Default for Periodic {
    fn default() -> Self {
        Self::new()
    }
}

impl Periodic {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            sender,
            receiver,
        }
    }

    /// Register `command` for `context`, replacing any previous command of the same context.
    pub fn add(&self, context: WidgetId, command: impl Into<String>) {
        let command = command.into();
        let mut registry = self.registry.lock();
        match registry.locate(context) {
            Ok(pos) => registry.commands[pos].command = command,
            Err(pos) => registry
                .commands
                .insert(pos, PeriodicCommand { context, command }),
        }
        tracing::trace!(target: targets::PERIODIC, ?context, "periodic command registered");
    }

    /// Remove the registration of `context`. Returns whether one existed.
    pub fn remove(&self, context: WidgetId) -> bool {
        let mut registry = self.registry.lock();
        match registry.locate(context) {
            Ok(pos) => {
                registry.commands.remove(pos);
                tracing::trace!(target: targets::PERIODIC, ?context, "periodic command removed");
                true
            }
            Err(_) => false,
        }
    }

    /// Whether `context` has a registration.
    pub fn contains(&self, context: WidgetId) -> bool {
        self.registry.lock().locate(context).is_ok()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.registry.lock().commands.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Post a copy of every registered command to the delivery channel.
    pub fn post_all(&self) {
        let registry = self.registry.lock();
        for pc in &registry.commands {
            // The receiver lives in `self`, so the channel cannot be disconnected here.
            let _ = self.sender.send(pc.command.clone());
        }
    }

    /// Take every command posted so far, in posting order.
    pub fn drain(&self) -> Vec<String> {
        self.receiver.try_iter().collect()
    }

    /// Start a thread that calls [`post_all`](Self::post_all) every `interval`.
    ///
    /// The thread runs until the returned [`PeriodicTimer`] is stopped or dropped.
    pub fn start_timer(&self, interval: Duration) -> CoreResult<PeriodicTimer> {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let periodic = self.clone();
        let handle = std::thread::Builder::new()
            .name("trellis-periodic".to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => periodic.post_all(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!(target: targets::PERIODIC, "periodic timer stopped");
            })
            .map_err(CoreError::TimerSpawn)?;
        tracing::debug!(target: targets::PERIODIC, ?interval, "periodic timer started");
        Ok(PeriodicTimer {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }
}

/// Guard for a running periodic timer thread.
#[derive(Debug)]
pub struct PeriodicTimer {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTimer {
    /// Stop the timer and wait for its thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender disconnects the channel and wakes the thread.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!(target: targets::PERIODIC, "periodic timer thread panicked");
            }
        }
    }
}

impl Drop for PeriodicTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

static_assertions::assert_impl_all!(Periodic: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::time::Instant;

    fn ids(n: usize) -> Vec<WidgetId> {
        let mut map: SlotMap<WidgetId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_add_replaces_existing_context() {
        let ids = ids(2);
        let periodic = Periodic::new();
        periodic.add(ids[0], "a.tick");
        periodic.add(ids[1], "b.tick");
        periodic.add(ids[0], "a.tock");
        assert_eq!(periodic.len(), 2);

        periodic.post_all();
        let mut posted = periodic.drain();
        posted.sort();
        assert_eq!(posted, vec!["a.tock".to_string(), "b.tick".to_string()]);
    }

    #[test]
    fn test_remove() {
        let ids = ids(3);
        let periodic = Periodic::new();
        for id in &ids {
            periodic.add(*id, "tick");
        }
        assert!(periodic.remove(ids[1]));
        assert!(!periodic.remove(ids[1]));
        assert!(!periodic.contains(ids[1]));
        assert!(periodic.contains(ids[2]));
        assert_eq!(periodic.len(), 2);
    }

    #[test]
    fn test_drain_is_empty_without_posts() {
        let periodic = Periodic::new();
        assert!(periodic.is_empty());
        assert!(periodic.drain().is_empty());
    }

    #[test]
    fn test_clones_share_registry() {
        let ids = ids(1);
        let periodic = Periodic::new();
        let other = periodic.clone();
        other.add(ids[0], "shared");
        periodic.post_all();
        assert_eq!(other.drain(), vec!["shared".to_string()]);
    }

    #[test]
    fn test_timer_thread_posts_until_stopped() {
        let ids = ids(1);
        let periodic = Periodic::new();
        periodic.add(ids[0], "poll");

        let timer = periodic
            .start_timer(Duration::from_millis(5))
            .expect("spawn timer");
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut received = Vec::new();
        while received.is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            received = periodic.drain();
        }
        timer.stop();

        assert!(received.iter().all(|c| c == "poll"));
        assert!(!received.is_empty());
    }
}
