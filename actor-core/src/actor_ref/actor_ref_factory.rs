use crate::actor::actor_system::ActorSystem;
use crate::actor::props::Props;
use crate::actor_ref::ActorRef;

pub trait ActorRefFactory {
    fn system(&self) -> &ActorSystem;

    fn spawn(&self, props: Props, name: impl Into<String>) -> anyhow::Result<ActorRef>;

    fn spawn_anonymous(&self, props: Props) -> anyhow::Result<ActorRef>;

    /// Stops the actor ahead of its pending user messages.
    fn stop(&self, actor: &ActorRef);
}
