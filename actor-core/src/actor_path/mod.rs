use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::random;

/// Location of an actor in the hierarchy plus the uid of the incarnation living there.
///
/// Two paths are equal only when both the location and the uid match, so an actor
/// re-created under the same name never compares equal to its predecessor.
#[derive(Clone)]
pub struct ActorPath {
    inner: Arc<Inner>,
}

struct Inner {
    parent: Option<ActorPath>,
    name: String,
    uid: i32,
    full: String,
}

impl ActorPath {
    pub const fn undefined_uid() -> i32 {
        0
    }

    pub fn new_uid() -> i32 {
        loop {
            let uid = random::<i32>();
            if uid != Self::undefined_uid() {
                return uid;
            }
        }
    }

    pub fn root(system: &str) -> Self {
        let inner = Inner {
            parent: None,
            name: system.to_string(),
            uid: Self::undefined_uid(),
            full: format!("actor://{}", system),
        };
        Self { inner: inner.into() }
    }

    pub fn child(&self, name: impl Into<String>, uid: i32) -> Self {
        let name = name.into();
        let full = format!("{}/{}", self.inner.full, name);
        let inner = Inner {
            parent: Some(self.clone()),
            name,
            uid,
            full,
        };
        Self { inner: inner.into() }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn uid(&self) -> i32 {
        self.inner.uid
    }

    pub fn parent(&self) -> Option<&ActorPath> {
        self.inner.parent.as_ref()
    }

    pub fn root_name(&self) -> &str {
        match &self.inner.parent {
            None => &self.inner.name,
            Some(parent) => parent.root_name(),
        }
    }

    pub fn elements(&self) -> Vec<&str> {
        let mut elements = vec![];
        let mut current = Some(self);
        while let Some(path) = current {
            if path.parent().is_some() {
                elements.push(path.name());
            }
            current = path.parent();
        }
        elements.reverse();
        elements
    }
}

impl Display for ActorPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.full)
    }
}

impl Debug for ActorPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorPath")
            .field("path", &self.inner.full)
            .field("uid", &self.inner.uid)
            .finish()
    }
}

impl PartialEq for ActorPath {
    fn eq(&self, other: &Self) -> bool {
        self.inner.uid == other.inner.uid && self.inner.full == other.inner.full
    }
}

impl Eq for ActorPath {}

impl Hash for ActorPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.full.hash(state);
        self.inner.uid.hash(state);
    }
}

impl PartialOrd for ActorPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ActorPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner
            .full
            .cmp(&other.inner.full)
            .then(self.inner.uid.cmp(&other.inner.uid))
    }
}

#[cfg(test)]
mod tests {
    use crate::actor_path::ActorPath;

    #[test]
    fn test_path_elements() {
        let root = ActorPath::root("iot");
        let manager = root.child("user", 1).child("manager", 2);
        assert_eq!(manager.to_string(), "actor://iot/user/manager");
        assert_eq!(manager.elements(), vec!["user", "manager"]);
        assert_eq!(manager.root_name(), "iot");
        assert_eq!(manager.parent().map(|p| p.name()), Some("user"));
    }

    #[test]
    fn test_incarnations_differ() {
        let user = ActorPath::root("iot").child("user", 1);
        let first = user.child("group-g1", 10);
        let second = user.child("group-g1", 11);
        assert_ne!(first, second);
        assert_eq!(first, user.child("group-g1", 10));
    }
}
