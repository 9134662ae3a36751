//! Bounded, self-expiring toast queue.
//!
//! At most `TOAST_CAPACITY` toasts are visible; adding one more evicts the
//! oldest. Every toast with a non-zero duration owns exactly one dismiss timer
//! on the tokio runtime, and that timer is aborted whenever the toast leaves
//! the queue by any other path.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub const TOAST_CAPACITY: usize = 3;
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub title: Option<String>,
    pub message: String,
    /// Zero keeps the toast until it is hidden explicitly.
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastConfig {
    pub kind: ToastKind,
    pub title: Option<String>,
    pub message: String,
    pub duration: Option<Duration>,
}

impl ToastConfig {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: None,
            message: message.into(),
            duration: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn sticky(self) -> Self {
        self.duration(Duration::ZERO)
    }
}

#[derive(Default)]
struct QueueState {
    toasts: VecDeque<Toast>,
    timers: HashMap<ToastId, JoinHandle<()>>,
    next_id: u64,
}

struct Shared {
    state: Mutex<QueueState>,
    visible: watch::Sender<Vec<Toast>>,
}

impl Shared {
    fn publish(&self, state: &QueueState) {
        self.visible
            .send_replace(state.toasts.iter().cloned().collect());
    }

    fn hide(&self, id: ToastId) -> bool {
        let mut state = self.state.lock().expect("toast mutex poisoned");
        if let Some(timer) = state.timers.remove(&id) {
            timer.abort();
        }
        let before = state.toasts.len();
        state.toasts.retain(|toast| toast.id != id);
        let removed = state.toasts.len() != before;
        if removed {
            self.publish(&state);
        }
        removed
    }

    /// Called from the timer task itself, so it must not abort its own handle.
    fn expire(&self, id: ToastId) {
        let mut state = self.state.lock().expect("toast mutex poisoned");
        if state.timers.remove(&id).is_none() {
            return;
        }
        state.toasts.retain(|toast| toast.id != id);
        debug!(toast_id = id.0, "toast expired");
        self.publish(&state);
    }
}

/// Cheap to clone; clones share one queue. Must be used inside a tokio
/// runtime because dismiss timers are spawned tasks.
#[derive(Clone)]
pub struct ToastQueue {
    shared: Arc<Shared>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        let (visible, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState::default()),
                visible,
            }),
        }
    }

    pub fn show(&self, config: ToastConfig) -> ToastId {
        let mut state = self.shared.state.lock().expect("toast mutex poisoned");
        state.next_id += 1;
        let id = ToastId(state.next_id);
        let duration = config.duration.unwrap_or(DEFAULT_TOAST_DURATION);

        state.toasts.push_back(Toast {
            id,
            kind: config.kind,
            title: config.title,
            message: config.message,
            duration,
            created_at: Utc::now(),
        });

        while state.toasts.len() > TOAST_CAPACITY {
            if let Some(evicted) = state.toasts.pop_front() {
                if let Some(timer) = state.timers.remove(&evicted.id) {
                    timer.abort();
                }
                debug!(toast_id = evicted.id.0, "toast evicted over capacity");
            }
        }

        if !duration.is_zero() {
            let timer = spawn_dismiss(Arc::downgrade(&self.shared), id, duration);
            state.timers.insert(id, timer);
        }

        self.shared.publish(&state);
        id
    }

    /// Removes a toast and cancels its timer. Unknown ids are ignored.
    pub fn hide(&self, id: ToastId) -> bool {
        self.shared.hide(id)
    }

    pub fn clear(&self) {
        let mut state = self.shared.state.lock().expect("toast mutex poisoned");
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        state.toasts.clear();
        self.shared.publish(&state);
    }

    pub fn success(&self, message: impl Into<String>, title: Option<&str>) -> ToastId {
        self.show_kind(ToastKind::Success, message, title)
    }

    pub fn error(&self, message: impl Into<String>, title: Option<&str>) -> ToastId {
        self.show_kind(ToastKind::Error, message, title)
    }

    pub fn warning(&self, message: impl Into<String>, title: Option<&str>) -> ToastId {
        self.show_kind(ToastKind::Warning, message, title)
    }

    pub fn info(&self, message: impl Into<String>, title: Option<&str>) -> ToastId {
        self.show_kind(ToastKind::Info, message, title)
    }

    fn show_kind(
        &self,
        kind: ToastKind,
        message: impl Into<String>,
        title: Option<&str>,
    ) -> ToastId {
        let mut config = ToastConfig::new(kind, message);
        config.title = title.map(str::to_string);
        self.show(config)
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.shared.visible.borrow().clone()
    }

    pub fn pending_timers(&self) -> usize {
        let state = self.shared.state.lock().expect("toast mutex poisoned");
        state.timers.len()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.shared.visible.subscribe()
    }
}

fn spawn_dismiss(shared: Weak<Shared>, id: ToastId, duration: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        if let Some(shared) = shared.upgrade() {
            shared.expire(id);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(queue: &ToastQueue) -> Vec<u64> {
        queue.toasts().iter().map(|toast| toast.id.0).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_only_the_newest_three() {
        let queue = ToastQueue::new();
        for n in 1..=5 {
            queue.info(format!("message {n}"), None);
        }

        assert_eq!(ids(&queue), vec![3, 4, 5]);
        assert_eq!(queue.pending_timers(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn expires_after_its_duration() {
        let queue = ToastQueue::new();
        queue.show(
            ToastConfig::new(ToastKind::Success, "saved").duration(Duration::from_millis(200)),
        );
        assert_eq!(queue.toasts().len(), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(queue.toasts().is_empty());
        assert_eq!(queue.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn evicted_toasts_do_not_fire_later() {
        let queue = ToastQueue::new();
        let first = queue
            .show(ToastConfig::new(ToastKind::Info, "first").duration(Duration::from_millis(100)));
        for _ in 0..3 {
            queue.show(ToastConfig::new(ToastKind::Info, "later").sticky());
        }
        assert!(!ids(&queue).contains(&first.0));
        assert_eq!(queue.pending_timers(), 0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(queue.toasts().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn sticky_toasts_wait_for_hide() {
        let queue = ToastQueue::new();
        let id = queue.show(ToastConfig::new(ToastKind::Warning, "check your licence").sticky());
        assert_eq!(queue.pending_timers(), 0);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(ids(&queue), vec![id.0]);

        assert!(queue.hide(id));
        assert!(!queue.hide(id), "second hide is a no-op");
        assert!(queue.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hide_cancels_the_timer() {
        let queue = ToastQueue::new();
        let id = queue.error("payment failed", Some("Payment"));
        let toast = queue.toasts().pop().expect("toast queued");
        assert_eq!(toast.duration, DEFAULT_TOAST_DURATION);
        assert_eq!(toast.title.as_deref(), Some("Payment"));
        assert_eq!(toast.kind, ToastKind::Error);

        queue.hide(id);
        assert_eq!(queue.pending_timers(), 0);
    }
}
