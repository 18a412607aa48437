use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{channel, unbounded_channel};

use crate::actor::mailbox::{Mailbox, MailboxSender, MessageReceiver, MessageSender};

pub const DEFAULT_MAILBOX: &str = "default";

/// User messages queue up to `capacity`, or without limit when unset. System messages
/// are never dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    pub throughput: usize,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            throughput: 10,
        }
    }
}

impl MailboxConfig {
    pub(crate) fn channel(&self) -> (MailboxSender, Mailbox) {
        let (message_tx, message_rx) = match self.capacity {
            Some(capacity) => {
                let (tx, rx) = channel(capacity.max(1));
                (MessageSender::Bounded(tx), MessageReceiver::Bounded(rx))
            }
            None => {
                let (tx, rx) = unbounded_channel();
                (MessageSender::Unbounded(tx), MessageReceiver::Unbounded(rx))
            }
        };
        let (system_tx, system_rx) = unbounded_channel();
        let sender = MailboxSender {
            message: message_tx,
            system: system_tx,
        };
        let mailbox = Mailbox {
            message: message_rx,
            system: system_rx,
            throughput: self.throughput.max(1),
        };
        (sender, mailbox)
    }
}
