//! Celebration signal and viewport tracking.
//!
//! Defeating the boss raises a celebration flag for a fixed window. Inside a
//! tokio runtime the flag is cleared by a single deferred task; triggering
//! again before it fires replaces that task, so the window always restarts
//! from the latest trigger. Outside a runtime the flag expires lazily against
//! its deadline when read.
//! The viewport size is ambient read-only state used to size the overlay.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// How long a celebration stays visible.
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(5);

/// Confetti pieces per celebration.
pub const CONFETTI_PIECES: u32 = 500;

/// Single-shot, restartable celebration flag.
pub struct Celebration {
    active: Arc<watch::Sender<bool>>,
    generation: Arc<AtomicU64>,
    duration: Duration,
    deadline: Option<Instant>,
    expiry: Option<JoinHandle<()>>,
}

impl Celebration {
    pub fn new() -> Self {
        Self::with_duration(CELEBRATION_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            active: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            duration,
            deadline: None,
            expiry: None,
        }
    }

    /// Raise the flag and (re)start the window.
    pub fn trigger(&mut self) {
        if let Some(pending) = self.expiry.take() {
            pending.abort();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let deadline = Instant::now() + self.duration;
        self.deadline = Some(deadline);
        self.active.send_replace(true);

        let Ok(runtime) = Handle::try_current() else {
            debug!(generation, duration = ?self.duration, "celebration started without runtime");
            return;
        };
        let active = Arc::clone(&self.active);
        let current = Arc::clone(&self.generation);
        self.expiry = Some(runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // A newer trigger owns the flag now.
            active.send_if_modified(|flag| {
                if current.load(Ordering::SeqCst) == generation && *flag {
                    *flag = false;
                    true
                } else {
                    false
                }
            });
        }));
        debug!(generation, duration = ?self.duration, "celebration started");
    }

    /// Drop the flag immediately and forget the pending expiry.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.expiry.take() {
            pending.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.deadline = None;
        self.active.send_replace(false);
    }

    pub fn is_active(&self) -> bool {
        if !*self.active.borrow() {
            return false;
        }
        match self.deadline {
            Some(deadline) if Instant::now() < deadline => true,
            _ => {
                self.active.send_if_modified(|flag| std::mem::replace(flag, false));
                false
            }
        }
    }

    /// Time left in the current window, if one is running.
    pub fn remaining(&self) -> Option<Duration> {
        if !self.is_active() {
            return None;
        }
        let deadline = self.deadline?;
        Some(deadline.saturating_duration_since(Instant::now()))
    }

    /// Watch the flag. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }

    /// Overlay dimensions for the current viewport, while active.
    pub fn overlay(&self, viewport: &Viewport) -> Option<Overlay> {
        self.is_active().then(|| {
            let size = viewport.size();
            Overlay {
                width: size.width,
                height: size.height,
                pieces: CONFETTI_PIECES,
            }
        })
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Celebration {
    fn drop(&mut self) {
        if let Some(pending) = self.expiry.take() {
            pending.abort();
        }
    }
}

/// What a renderer needs to draw the celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub width: u16,
    pub height: u16,
    pub pieces: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u16,
    pub height: u16,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Current viewport size plus change notifications.
pub struct Viewport {
    size: watch::Sender<ViewportSize>,
}

impl Viewport {
    pub fn new(initial: ViewportSize) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { size: tx }
    }

    /// Start from the terminal's size, or 80x24 when there is no terminal.
    pub fn from_terminal() -> Self {
        Self::new(terminal_size().unwrap_or_default())
    }

    pub fn size(&self) -> ViewportSize {
        *self.size.borrow()
    }

    /// Subscribe to size changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<ViewportSize> {
        self.size.subscribe()
    }

    /// Record a resize notification. Returns whether the size changed.
    pub fn resize(&self, width: u16, height: u16) -> bool {
        let next = ViewportSize { width, height };
        self.size.send_if_modified(|size| {
            if *size == next {
                false
            } else {
                *size = next;
                true
            }
        })
    }

    /// Re-query the terminal and record any change.
    pub fn refresh(&self) -> bool {
        match terminal_size() {
            Some(size) => self.resize(size.width, size.height),
            None => false,
        }
    }
}

fn terminal_size() -> Option<ViewportSize> {
    crossterm::terminal::size()
        .ok()
        .map(|(width, height)| ViewportSize { width, height })
}
