use actor_derive::Message;

use crate::actor_ref::ActorRef;

/// Sent by a stopped actor to its parent and to everyone watching it.
#[derive(Debug, Clone, Message)]
pub struct DeathWatchNotification {
    pub actor: ActorRef,
}
