use actor_derive::Message;

/// Stops the receiver once every user message queued before it has been handled.
#[derive(Debug, Copy, Clone, Message)]
pub struct PoisonPill;
