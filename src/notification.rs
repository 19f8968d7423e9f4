//! Diagnostics gathered while decoding.
//!
//! A decode pass does not stop for problems confined to one framed opcode.
//! Those land here instead, so callers can see after the fact what was
//! skipped. See [`W2dDrawing::notifications`].
//!
//! [`W2dDrawing::notifications`]: crate::drawing::W2dDrawing::notifications

use std::fmt;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// Opcode was framed correctly but its contents are carried opaquely.
    NotImplemented,
    /// Decoded, with leftovers (trailing payload bytes and the like).
    Warning,
    /// A framed opcode failed to decode and was skipped.
    Error,
}

impl NotificationType {
    fn label(self) -> &'static str {
        match self {
            NotificationType::NotImplemented => "NotImplemented",
            NotificationType::Warning => "Warning",
            NotificationType::Error => "Error",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub notification_type: NotificationType,
    pub message: String,
    /// Stream offset of the opcode, if there was one.
    pub offset: Option<u64>,
}

impl Notification {
    pub fn new(kind: NotificationType, message: impl Into<String>) -> Self {
        Notification {
            notification_type: kind,
            message: message.into(),
            offset: None,
        }
    }

    pub fn at(kind: NotificationType, offset: u64, message: impl Into<String>) -> Self {
        Notification {
            offset: Some(offset),
            ..Notification::new(kind, message)
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.notification_type)?;
        if let Some(offset) = self.offset {
            write!(f, " @{offset}:")?;
        }
        write!(f, " {}", self.message)
    }
}

/// Ordered list of diagnostics for one decode.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    entries: Vec<Notification>,
}

impl NotificationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, kind: NotificationType, message: impl Into<String>) {
        self.entries.push(Notification::new(kind, message));
    }

    /// Like [`notify`](Self::notify), tagged with the opcode offset.
    pub fn notify_at(&mut self, kind: NotificationType, offset: u64, message: impl Into<String>) {
        self.entries.push(Notification::at(kind, offset, message));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.entries.iter()
    }

    pub fn of_type(&self, kind: NotificationType) -> Vec<&Notification> {
        self.iter().filter(|n| n.notification_type == kind).collect()
    }

    pub fn has_type(&self, kind: NotificationType) -> bool {
        self.iter().any(|n| n.notification_type == kind)
    }
}

impl IntoIterator for NotificationCollection {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
