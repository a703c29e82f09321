//! Serial port hot-plug tracking and user notifications.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::consts::NOTIFICATION_TIMEOUT;

#[cfg(feature = "sync")]
use crate::prelude::*;

/// Difference between two port listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortChange {
    /// Ports that appeared.
    pub attached: Vec<String>,
    /// Ports that disappeared.
    pub detached: Vec<String>,
}

/// Tracks available ports between polls.
///
/// The first update reports every listed port as attached.
#[derive(Clone, Debug, Default)]
pub struct PortWatcher {
    known: BTreeSet<String>,
}

/// User-facing message about a port change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notification {
    /// Title.
    pub title: String,
    /// Body.
    pub text: String,
}

/// Notification delivery backend (desktop notifications, status bars, logs).
///
/// Notifiers are shared with removal threads and must be thread-safe.
pub trait Notifier: Send + Sync + 'static {
    /// Shows a notification.
    fn deliver(&self, notification: &Notification);

    /// Removes a previously delivered notification.
    fn remove(&self, notification: &Notification);
}

/// [`Notifier`] that writes notifications to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl PortChange {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }
}

impl PortWatcher {
    /// Creates a watcher that knows no ports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ports seen during the last update in lexicographic order.
    pub fn known(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    /// Replaces the known listing with `ports` and returns what changed.
    pub fn update<I, S>(&mut self, ports: I) -> PortChange
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current: BTreeSet<String> = ports.into_iter().map(Into::into).collect();

        let change = PortChange {
            attached: current.difference(&self.known).cloned().collect(),
            detached: self.known.difference(&current).cloned().collect(),
        };
        self.known = current;

        if !change.is_empty() {
            log::debug!("[hotplug] ports changed: {change:?}");
        }
        change
    }

    /// Lists serial ports and updates the watcher.
    #[cfg(feature = "sync")]
    pub fn poll(&mut self) -> Result<PortChange> {
        let ports = serialport::available_ports()?;
        Ok(self.update(ports.into_iter().map(|port| port.port_name)))
    }
}

impl Notification {
    /// Creates a notification.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Notification about a newly attached port.
    pub fn connected(port: &str) -> Self {
        Self::new("Serial Port Connected", port)
    }

    /// Notification about a detached port.
    pub fn disconnected(port: &str) -> Self {
        Self::new("Serial Port Disconnected", port)
    }

    /// Notifications for every port in `change`, attachments first.
    pub fn for_change(change: &PortChange) -> Vec<Self> {
        change
            .attached
            .iter()
            .map(|port| Self::connected(port))
            .chain(change.detached.iter().map(|port| Self::disconnected(port)))
            .collect()
    }
}

impl Notifier for LogNotifier {
    fn deliver(&self, notification: &Notification) {
        log::info!("[notify] {}: {}", notification.title, notification.text);
    }

    fn remove(&self, notification: &Notification) {
        log::trace!("[notify] removed: {}", notification.title);
    }
}

/// Delivers a notification and removes it after [`NOTIFICATION_TIMEOUT`].
pub fn notify<N: Notifier>(notifier: &Arc<N>, notification: Notification) {
    notifier.deliver(&notification);
    schedule_removal(notifier.clone(), notification, NOTIFICATION_TIMEOUT);
}

/// Removes `notification` from `notifier` after `delay` on a detached thread.
///
/// Nothing is reported back, the caller is never blocked.
pub fn schedule_removal<N: Notifier>(notifier: Arc<N>, notification: Notification, delay: Duration) {
    thread::spawn(move || {
        thread::sleep(delay);
        notifier.remove(&notification);
    });
}
