use chrono::Utc;
use indexmap::IndexMap;
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn label(self) -> &'static str {
        match self {
            ToastKind::Success => "Success",
            ToastKind::Error => "Error",
            ToastKind::Warning => "Warning",
            ToastKind::Info => "Info",
        }
    }
}

/// Creation time in milliseconds plus a random tiebreaker, so two toasts
/// raised in the same millisecond still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId {
    issued_ms: i64,
    nonce: u64,
}

impl ToastId {
    fn generate() -> Self {
        Self {
            issued_ms: Utc::now().timestamp_millis(),
            nonce: uuid::Uuid::new_v4().as_u64_pair().0,
        }
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:016x}", self.issued_ms, self.nonce)
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
    pub created_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

/// Anything that can put a message in front of the user.
pub trait Notifier {
    fn notify(&mut self, message: String, kind: ToastKind, duration: Duration) -> ToastId;

    fn success(&mut self, message: &str) -> ToastId {
        self.notify(message.to_string(), ToastKind::Success, DEFAULT_TOAST_DURATION)
    }

    fn error(&mut self, message: &str) -> ToastId {
        self.notify(message.to_string(), ToastKind::Error, DEFAULT_TOAST_DURATION)
    }

    fn warning(&mut self, message: &str) -> ToastId {
        self.notify(message.to_string(), ToastKind::Warning, DEFAULT_TOAST_DURATION)
    }

    fn info(&mut self, message: &str) -> ToastId {
        self.notify(message.to_string(), ToastKind::Info, DEFAULT_TOAST_DURATION)
    }
}

/// Active toasts, oldest first. Each one expires on its own clock.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: IndexMap<ToastId, Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the toast with `id`. Unknown ids leave the queue untouched.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        self.toasts.shift_remove(&id).is_some()
    }

    pub fn dismiss_oldest(&mut self) -> bool {
        match self.toasts.keys().next().copied() {
            Some(id) => self.dismiss(id),
            None => false,
        }
    }

    /// Id of the toast at `index` in display order (0 is the oldest).
    pub fn id_at(&self, index: usize) -> Option<ToastId> {
        self.toasts.get_index(index).map(|(id, _)| *id)
    }

    /// Drops every toast whose duration has elapsed at `now`.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|_, toast| !toast.is_expired(now));
        before - self.toasts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.values()
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.get(&id)
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, message: String, kind: ToastKind, duration: Duration) -> ToastId {
        let mut id = ToastId::generate();
        while self.toasts.contains_key(&id) {
            id = ToastId::generate();
        }

        tracing::debug!(%id, ?kind, %message, "toast queued");
        self.toasts.insert(
            id,
            Toast {
                id,
                message,
                kind,
                duration,
                created_at: Instant::now(),
            },
        );
        id
    }
}
