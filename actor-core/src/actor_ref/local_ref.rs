use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::actor::actor_system::ActorSystem;
use crate::actor::mailbox::MailboxSender;
use crate::actor::props::Props;
use crate::actor_path::ActorPath;
use crate::actor_ref::{ActorRef, ActorRefExt, TActorRef};
use crate::cell::envelope::Envelope;
use crate::cell::ActorCell;
use crate::ext::{check_name, random_actor_name};
use crate::message::death_watch_notification::DeathWatchNotification;
use crate::message::watch::Watch;
use crate::message::{downcast_ref, is_system_message, DynMessage};

#[derive(Clone)]
pub struct LocalActorRef {
    pub(crate) inner: Arc<Inner>,
}

pub struct Inner {
    pub(crate) path: ActorPath,
    pub(crate) sender: MailboxSender,
    pub(crate) cell: ActorCell,
}

impl Deref for LocalActorRef {
    type Target = Arc<Inner>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for LocalActorRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalActorRef")
            .field("path", &self.path)
            .field("cell", &self.cell)
            .finish_non_exhaustive()
    }
}

impl TActorRef for LocalActorRef {
    fn path(&self) -> &ActorPath {
        &self.path
    }

    fn tell(&self, message: DynMessage, sender: Option<ActorRef>) {
        let envelope = Envelope { message, sender };
        if is_system_message(envelope.message.as_ref()) {
            if let Err(error) = self.sender.system.send(envelope) {
                self.system_dead_letter(error.0);
            }
        } else if let Err(error) = self.sender.message.try_send(envelope) {
            self.log_send_error(error);
        }
    }

    fn parent(&self) -> Option<&ActorRef> {
        self.cell.parent()
    }
}

impl LocalActorRef {
    pub(crate) fn new(path: ActorPath, sender: MailboxSender, parent: Option<ActorRef>) -> Self {
        let inner = Inner {
            path,
            sender,
            cell: ActorCell::new(parent),
        };
        Self { inner: inner.into() }
    }

    pub(crate) fn attach_child(
        &self,
        system: &ActorSystem,
        props: Props,
        name: Option<String>,
    ) -> anyhow::Result<ActorRef> {
        let name = match name {
            Some(name) => {
                check_name(&name)?;
                name
            }
            None => random_actor_name(),
        };
        let Props { name: actor_name, creator, mailbox } = props;
        let (sender, mailbox) = system.config().mailbox(mailbox.as_deref())?.channel();
        let path = self.path.child(name.clone(), ActorPath::new_uid());
        let child = LocalActorRef::new(path, sender, Some(self.clone().into()));
        let child_ref: ActorRef = child.clone().into();
        self.cell.insert_child(name, child_ref.clone())?;
        if let Err(error) = creator(child, mailbox, system.clone()) {
            self.cell.remove_child(&child_ref);
            return Err(error.context(format!("create actor {} failed", actor_name)));
        }
        debug!("{} spawned {} as {}", self.path, actor_name, child_ref);
        Ok(child_ref)
    }

    /// A watch arriving after the actor stopped is answered right away, so the
    /// watcher still observes the termination.
    fn system_dead_letter(&self, envelope: Envelope) {
        let myself: ActorRef = self.clone().into();
        match downcast_ref::<Watch>(envelope.message.as_ref()) {
            Some(watch) if watch.watchee == myself && watch.watcher != myself => {
                debug!("{} already stopped, notify watcher {}", myself, watch.watcher);
                watch.watcher.cast_ns(DeathWatchNotification { actor: myself });
            }
            _ => {
                debug!("system message {} to stopped {} was dropped", envelope.name(), myself);
            }
        }
    }

    fn log_send_error(&self, error: TrySendError<Envelope>) {
        let actor: ActorRef = self.clone().into();
        let (envelope, reason) = match error {
            TrySendError::Full(envelope) => (envelope, "mailbox is full"),
            TrySendError::Closed(envelope) => (envelope, "actor stopped"),
        };
        match &envelope.sender {
            None => {
                warn!(
                    "message {} to {} was not delivered because {}",
                    envelope.name(),
                    actor,
                    reason
                );
            }
            Some(sender) => {
                warn!(
                    "message {} from {} to {} was not delivered because {}",
                    envelope.name(),
                    sender,
                    actor,
                    reason
                );
            }
        }
    }
}
