use std::ops::Deref;

use actor_derive::Message;

use crate::actor_ref::ActorRef;

/// Delivered exactly once to a watcher when the watched actor has stopped.
#[derive(Debug, Clone, Message)]
pub struct Terminated {
    pub actor: ActorRef,
}

impl Terminated {
    pub fn new(actor: ActorRef) -> Self {
        Self { actor }
    }
}

impl Deref for Terminated {
    type Target = ActorRef;

    fn deref(&self) -> &Self::Target {
        &self.actor
    }
}
