//! Utilities to deliver fired reminders to the user

use std::fmt::{Display, Error, Formatter};
use std::sync::{Mutex, PoisonError};

use crate::traits::Notifier;

/// Whether system notifications may be shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    /// The user has not been asked yet
    Default,
    Granted,
    Denied,
}

impl Default for Permission {
    fn default() -> Self {
        Self::Default
    }
}


/// Something the user is told when a reminder fires
#[derive(Clone, Debug, PartialEq)]
pub enum ReminderEvent {
    /// A transient, in-app notice
    Notice { message: String },
    /// A system notification
    System { title: String, body: String },
}

impl Display for ReminderEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ReminderEvent::Notice{message} => write!(f, "{}", message),
            ReminderEvent::System{title, body} => write!(f, "[{}] {}", title, body),
        }
    }
}



/// See [`ChannelNotifier::new`]
pub type NoticeSender = tokio::sync::mpsc::UnboundedSender<ReminderEvent>;
/// See [`ChannelNotifier::new`]
pub type NoticeReceiver = tokio::sync::mpsc::UnboundedReceiver<ReminderEvent>;


/// A notifier that forwards every event to a channel, e.g. to a UI that displays them
pub struct ChannelNotifier {
    sender: NoticeSender,
    permission: Mutex<Permission>,
    /// What the user answers when asked for the permission
    answer: Permission,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its events.
    ///
    /// `answer` is what the (simulated) user will reply when the permission is requested.
    pub fn new(answer: Permission) -> (Self, NoticeReceiver) {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        let notifier = Self {
            sender,
            permission: Mutex::new(Permission::Default),
            answer,
        };
        (notifier, receiver)
    }

    /// Change the permission status, like a user would do in the settings of their platform
    pub fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner) = permission;
    }

    fn send(&self, event: ReminderEvent) {
        if let Err(err) = self.sender.send(event) {
            log::debug!("Nobody is listening to reminders any more ({})", err.0);
        }
    }
}

impl Notifier for ChannelNotifier {
    fn request_permission(&self) -> Permission {
        let mut permission = self.permission.lock().unwrap_or_else(PoisonError::into_inner);
        if *permission == Permission::Default {
            *permission = self.answer;
        }
        *permission
    }

    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notice(&self, message: &str) {
        self.send(ReminderEvent::Notice { message: message.to_string() });
    }

    fn system_notification(&self, title: &str, body: &str) {
        self.send(ReminderEvent::System { title: title.to_string(), body: body.to_string() });
    }
}


/// A notifier that only writes to the log. System notifications are always allowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn notice(&self, message: &str) {
        log::info!("{}", message);
    }

    fn system_notification(&self, title: &str, body: &str) {
        log::info!("[{}] {}", title, body);
    }
}
