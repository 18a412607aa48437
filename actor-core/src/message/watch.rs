use actor_derive::Message;

use crate::actor_ref::ActorRef;

#[derive(Debug, Clone, Message)]
pub struct Watch {
    pub watchee: ActorRef,
    pub watcher: ActorRef,
}
