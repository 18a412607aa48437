use std::any::Any;
use std::fmt::Debug;

pub mod death_watch_notification;
pub mod poison_pill;
pub mod terminate;
pub mod terminated;
pub mod unwatch;
pub mod watch;

pub type DynMessage = Box<dyn Message>;

/// Anything that can be put into a mailbox, usually implemented with
/// `#[derive(Message)]`.
pub trait Message: Any + Send + Debug {
    fn signature_sized() -> &'static str
    where
        Self: Sized;

    fn signature(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

pub fn downcast_ref<M>(message: &dyn Message) -> Option<&M>
where
    M: Message,
{
    message.as_any().downcast_ref()
}

pub fn downcast_into<M>(message: DynMessage) -> Result<Box<M>, Box<dyn Any>>
where
    M: Message,
{
    message.into_any().downcast()
}

pub(crate) fn is_system_message(message: &dyn Message) -> bool {
    use death_watch_notification::DeathWatchNotification;
    use terminate::Terminate;
    use unwatch::Unwatch;
    use watch::Watch;

    let name = message.signature();
    name == Watch::signature_sized()
        || name == Unwatch::signature_sized()
        || name == DeathWatchNotification::signature_sized()
        || name == Terminate::signature_sized()
}
