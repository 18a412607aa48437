use actor_derive::Message;

/// Stops the receiver ahead of its pending user messages.
#[derive(Debug, Copy, Clone, Message)]
pub struct Terminate;
