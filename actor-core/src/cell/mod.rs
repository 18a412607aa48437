use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::actor_ref::ActorRef;
use crate::error::ActorError;

pub(crate) mod envelope;
pub(crate) mod runtime;

/// Parent link and live children of one actor, shared between its ref and its runtime.
#[derive(Clone)]
pub(crate) struct ActorCell {
    inner: Arc<Inner>,
}

struct Inner {
    parent: Option<ActorRef>,
    children: DashMap<String, ActorRef>,
}

impl Debug for ActorCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorCell")
            .field("parent", &self.inner.parent)
            .field("children", &self.inner.children.len())
            .finish()
    }
}

impl ActorCell {
    pub(crate) fn new(parent: Option<ActorRef>) -> Self {
        let inner = Inner {
            parent,
            children: DashMap::new(),
        };
        Self { inner: inner.into() }
    }

    pub(crate) fn parent(&self) -> Option<&ActorRef> {
        self.inner.parent.as_ref()
    }

    pub(crate) fn children(&self) -> Vec<ActorRef> {
        self.inner.children.iter().map(|c| c.value().clone()).collect()
    }

    pub(crate) fn get_child(&self, name: &str) -> Option<ActorRef> {
        self.inner.children.get(name).map(|c| c.value().clone())
    }

    pub(crate) fn insert_child(&self, name: String, child: ActorRef) -> Result<(), ActorError> {
        match self.inner.children.entry(name) {
            Entry::Occupied(o) => Err(ActorError::DuplicateActorName(o.key().clone())),
            Entry::Vacant(v) => {
                v.insert(child);
                Ok(())
            }
        }
    }

    /// Only removes the entry if it still belongs to the given incarnation.
    pub(crate) fn remove_child(&self, child: &ActorRef) -> bool {
        self.inner
            .children
            .remove_if(child.path().name(), |_, c| c == child)
            .is_some()
    }

    pub(crate) fn has_children(&self) -> bool {
        !self.inner.children.is_empty()
    }
}
