use std::any::Any;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use dyn_clone::DynClone;

use crate::actor_path::ActorPath;
use crate::actor_ref::local_ref::LocalActorRef;
use crate::message::poison_pill::PoisonPill;
use crate::message::{DynMessage, Message};

pub mod actor_ref_factory;
pub mod deferred_ref;
pub mod local_ref;

pub trait TActorRef: Debug + Send + Sync + Any + DynClone {
    fn path(&self) -> &ActorPath;

    /// Enqueues without waiting; an undeliverable message is dropped and logged.
    fn tell(&self, message: DynMessage, sender: Option<ActorRef>);

    fn parent(&self) -> Option<&ActorRef>;

    fn stop(&self) {
        self.tell(Box::new(PoisonPill), ActorRef::no_sender());
    }
}

dyn_clone::clone_trait_object!(TActorRef);

impl<T: ?Sized> ActorRefExt for T where T: TActorRef {}

pub trait ActorRefExt: TActorRef {
    fn cast<M>(&self, message: M, sender: Option<ActorRef>)
    where
        M: Message,
    {
        self.tell(Box::new(message), sender);
    }

    fn cast_ns<M>(&self, message: M)
    where
        M: Message,
    {
        self.tell(Box::new(message), ActorRef::no_sender());
    }
}

#[derive(Clone)]
pub struct ActorRef(Box<dyn TActorRef>);

impl ActorRef {
    pub fn new<R>(actor_ref: R) -> Self
    where
        R: TActorRef,
    {
        Self(Box::new(actor_ref))
    }

    pub fn no_sender() -> Option<ActorRef> {
        None
    }
}

impl Deref for ActorRef {
    type Target = dyn TActorRef;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Display for ActorRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let path = self.path();
        let uid = path.uid();
        if uid == ActorPath::undefined_uid() {
            write!(f, "Actor[{}]", path)
        } else {
            write!(f, "Actor[{}#{}]", path, uid)
        }
    }
}

impl Debug for ActorRef {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("ActorRef")
            .field("path", self.path())
            .finish()
    }
}

impl Hash for ActorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path().hash(state);
    }
}

impl PartialEq<Self> for ActorRef {
    fn eq(&self, other: &Self) -> bool {
        self.path().eq(other.path())
    }
}

impl Eq for ActorRef {}

impl PartialOrd<Self> for ActorRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ActorRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path().cmp(other.path())
    }
}

impl From<LocalActorRef> for ActorRef {
    fn from(actor_ref: LocalActorRef) -> Self {
        ActorRef::new(actor_ref)
    }
}
