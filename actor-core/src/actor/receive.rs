use ahash::{HashMap, HashMapExt};
use anyhow::anyhow;

use crate::actor::context::ActorContext;
use crate::actor::Actor;
use crate::actor_ref::ActorRef;
use crate::message::{downcast_into, DynMessage, Message};

pub type ReceiveFn<A> =
    Box<dyn Fn(&mut A, &mut ActorContext, DynMessage, Option<ActorRef>) -> anyhow::Result<()> + Send + Sync>;

/// Handler table of an actor, keyed by message signature.
pub struct Receive<A: Actor> {
    receiver: HashMap<&'static str, ReceiveFn<A>>,
}

impl<A: Actor> Default for Receive<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Actor> Receive<A> {
    pub fn new() -> Self {
        Self {
            receiver: HashMap::new(),
        }
    }

    pub fn is<M>(
        mut self,
        handler: impl Fn(&mut A, &mut ActorContext, M, Option<ActorRef>) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self
    where
        M: Message,
    {
        let signature = M::signature_sized();
        self.receiver.insert(
            signature,
            Box::new(move |actor, ctx, message, sender| {
                let message = downcast_into::<M>(message)
                    .map_err(|_| anyhow!("downcast {signature} failed"))?;
                handler(actor, ctx, *message, sender)
            }),
        );
        self
    }

    /// Returns the message back when no handler is registered for it.
    pub(crate) fn receive(
        &self,
        actor: &mut A,
        ctx: &mut ActorContext,
        message: DynMessage,
        sender: Option<ActorRef>,
    ) -> Result<anyhow::Result<()>, DynMessage> {
        match self.receiver.get(message.signature()) {
            Some(receiver) => Ok(receiver(actor, ctx, message, sender)),
            None => Err(message),
        }
    }
}
