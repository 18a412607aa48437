use ahash::{HashMap, HashMapExt};
use anyhow::anyhow;

use actor_core::actor::context::{ActorContext, Context};
use actor_core::actor::props::Props;
use actor_core::actor_ref::actor_ref_factory::ActorRefFactory;
use actor_core::actor_ref::ActorRef;
use actor_core::ext::encode_name;

/// Children of a registry actor, indexed both by id and by handle.
///
/// Every id maps to at most one handle and every handle to at most one id; the two
/// directions always mirror each other.
#[derive(Debug, Default)]
pub struct ChildRegistry {
    by_id: HashMap<String, ActorRef>,
    by_ref: HashMap<ActorRef, String>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            by_ref: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ActorRef> {
        self.by_id.get(id)
    }

    pub fn id_of(&self, actor: &ActorRef) -> Option<&str> {
        self.by_ref.get(actor).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn insert(&mut self, id: impl Into<String>, actor: ActorRef) -> anyhow::Result<()> {
        let id = id.into();
        if let Some(exists) = self.by_id.get(&id) {
            return Err(anyhow!("id {} already registered to {}", id, exists));
        }
        if let Some(exists) = self.by_ref.get(&actor) {
            return Err(anyhow!("{} already registered as {}", actor, exists));
        }
        self.by_ref.insert(actor.clone(), id.clone());
        self.by_id.insert(id, actor);
        Ok(())
    }

    /// Removes the entry of `actor`, returning its id. Unknown handles are ignored.
    pub fn remove_by_ref(&mut self, actor: &ActorRef) -> Option<String> {
        let id = self.by_ref.remove(actor)?;
        self.by_id.remove(&id);
        Some(id)
    }

    pub fn snapshot(&self) -> HashMap<String, ActorRef> {
        self.by_id.clone()
    }

    pub fn is_consistent(&self) -> bool {
        self.by_id.len() == self.by_ref.len()
            && self
                .by_id
                .iter()
                .all(|(id, actor)| self.by_ref.get(actor) == Some(id))
    }

    /// Returns the child registered under `id`, spawning `{prefix}{id}` and watching it
    /// first when there is none. The flag tells whether a new child was created.
    pub fn get_or_spawn<F>(
        &mut self,
        ctx: &mut ActorContext,
        prefix: &str,
        id: &str,
        props: F,
    ) -> anyhow::Result<(ActorRef, bool)>
    where
        F: FnOnce() -> Props,
    {
        if let Some(actor) = self.by_id.get(id) {
            return Ok((actor.clone(), false));
        }
        let actor = ctx.spawn(props(), encode_name(prefix, id))?;
        ctx.watch(&actor);
        self.insert(id, actor.clone())?;
        Ok((actor, true))
    }
}
