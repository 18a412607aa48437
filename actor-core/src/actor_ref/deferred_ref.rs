use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use crate::actor_path::ActorPath;
use crate::actor_ref::{ActorRef, TActorRef};
use crate::cell::envelope::Envelope;
use crate::ext::random_name;
use crate::message::DynMessage;

/// Single use reply sink standing in as the sender of an ask.
#[derive(Debug, Clone)]
pub struct DeferredActorRef {
    path: ActorPath,
    sender: Arc<Mutex<Option<oneshot::Sender<Envelope>>>>,
}

impl DeferredActorRef {
    pub(crate) fn new(target: &ActorPath) -> (Self, oneshot::Receiver<Envelope>) {
        let (tx, rx) = oneshot::channel();
        let path = ActorPath::root(target.root_name())
            .child("temp", ActorPath::undefined_uid())
            .child(random_name("$"), ActorPath::new_uid());
        let deferred = Self {
            path,
            sender: Arc::new(Mutex::new(Some(tx))),
        };
        (deferred, rx)
    }
}

impl TActorRef for DeferredActorRef {
    fn path(&self) -> &ActorPath {
        &self.path
    }

    fn tell(&self, message: DynMessage, sender: Option<ActorRef>) {
        match self.sender.lock().take() {
            Some(tx) => {
                let _ = tx.send(Envelope { message, sender });
            }
            None => {
                debug!("{} already completed, drop {}", self.path, message.signature());
            }
        }
    }

    fn parent(&self) -> Option<&ActorRef> {
        None
    }
}

impl From<DeferredActorRef> for ActorRef {
    fn from(actor_ref: DeferredActorRef) -> Self {
        ActorRef::new(actor_ref)
    }
}
