use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{Receiver, Sender, UnboundedReceiver, UnboundedSender};

use crate::cell::envelope::Envelope;

pub(crate) struct Mailbox {
    pub(crate) message: MessageReceiver,
    pub(crate) system: UnboundedReceiver<Envelope>,
    pub(crate) throughput: usize,
}

impl Mailbox {
    /// Closes both queues and hands back the system messages that were still pending.
    pub(crate) fn close(&mut self) -> Vec<Envelope> {
        self.message.close();
        self.system.close();
        while self.message.try_recv().is_some() {}
        let mut pending = vec![];
        while let Ok(envelope) = self.system.try_recv() {
            pending.push(envelope);
        }
        pending
    }
}

pub(crate) enum MessageReceiver {
    Bounded(Receiver<Envelope>),
    Unbounded(UnboundedReceiver<Envelope>),
}

impl MessageReceiver {
    pub(crate) async fn recv(&mut self) -> Option<Envelope> {
        match self {
            MessageReceiver::Bounded(rx) => rx.recv().await,
            MessageReceiver::Unbounded(rx) => rx.recv().await,
        }
    }

    fn try_recv(&mut self) -> Option<Envelope> {
        match self {
            MessageReceiver::Bounded(rx) => rx.try_recv().ok(),
            MessageReceiver::Unbounded(rx) => rx.try_recv().ok(),
        }
    }

    fn close(&mut self) {
        match self {
            MessageReceiver::Bounded(rx) => rx.close(),
            MessageReceiver::Unbounded(rx) => rx.close(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum MessageSender {
    Bounded(Sender<Envelope>),
    Unbounded(UnboundedSender<Envelope>),
}

impl MessageSender {
    /// Never waits; a full bounded queue or a closed one hands the envelope back.
    pub(crate) fn try_send(&self, envelope: Envelope) -> Result<(), TrySendError<Envelope>> {
        match self {
            MessageSender::Bounded(tx) => tx.try_send(envelope),
            MessageSender::Unbounded(tx) => tx.send(envelope).map_err(|error| TrySendError::Closed(error.0)),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MailboxSender {
    pub(crate) message: MessageSender,
    pub(crate) system: UnboundedSender<Envelope>,
}
