use std::any::type_name;
use std::fmt::{Debug, Formatter};

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::ActorContext;
use crate::actor::mailbox::Mailbox;
use crate::actor::Actor;
use crate::actor_ref::local_ref::LocalActorRef;
use crate::cell::runtime::ActorRuntime;

type ActorCreator = Box<dyn FnOnce(LocalActorRef, Mailbox, ActorSystem) -> anyhow::Result<()> + Send>;

/// Recipe for creating an actor, consumed by a single spawn.
pub struct Props {
    pub(crate) name: &'static str,
    pub(crate) creator: ActorCreator,
    pub(crate) mailbox: Option<String>,
}

impl Debug for Props {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Props")
            .field("name", &self.name)
            .field("mailbox", &self.mailbox)
            .finish_non_exhaustive()
    }
}

impl Props {
    pub fn new<F, A>(actor_creator: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<A> + Send + 'static,
        A: Actor,
    {
        Self::new_with_ctx(move |_: &mut ActorContext| actor_creator())
    }

    pub fn new_with_ctx<F, A>(actor_creator: F) -> Self
    where
        F: FnOnce(&mut ActorContext) -> anyhow::Result<A> + Send + 'static,
        A: Actor,
    {
        let creator = move |myself: LocalActorRef, mailbox: Mailbox, system: ActorSystem| {
            let mut ctx = ActorContext::new(myself, system);
            let actor = actor_creator(&mut ctx)?;
            let handle = ctx.system.handle().clone();
            let runtime = ActorRuntime { actor, ctx, mailbox };
            handle.spawn(runtime.run());
            Ok::<_, anyhow::Error>(())
        };
        Self {
            name: type_name::<A>(),
            creator: Box::new(creator),
            mailbox: None,
        }
    }

    pub fn with_mailbox(mut self, mailbox: impl Into<String>) -> Self {
        self.mailbox = Some(mailbox.into());
        self
    }
}
