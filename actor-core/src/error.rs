use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActorError {
    #[error("actor name {0} is invalid, allowed chars a..=z, A..=Z, 0..=9, _ - . * + % $")]
    ActorNameInvalid(String),
    #[error("duplicate actor name {0}")]
    DuplicateActorName(String),
    #[error("cannot spawn child actor while {0} is terminating")]
    SpawnWhileTerminating(String),
    #[error("mailbox {0} not found in config")]
    MailboxNotFound(String),
    #[error("no tokio runtime found, create the actor system inside a runtime or set a handle")]
    NoRuntime,
}
