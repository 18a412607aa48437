use std::any::type_name;
use std::time::Duration;

use anyhow::anyhow;
use parking_lot::Mutex;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::actor::actor_system::ActorSystem;
use crate::actor_path::ActorPath;
use crate::actor_ref::{ActorRef, ActorRefExt, TActorRef};
use crate::cell::envelope::Envelope;
use crate::ext::random_name;
use crate::message::death_watch_notification::DeathWatchNotification;
use crate::message::terminated::Terminated;
use crate::message::watch::Watch;
use crate::message::{downcast_into, is_system_message, DynMessage};

#[derive(Debug, Clone)]
struct ProbeActorRef {
    path: ActorPath,
    sender: UnboundedSender<Envelope>,
}

impl TActorRef for ProbeActorRef {
    fn path(&self) -> &ActorPath {
        &self.path
    }

    fn tell(&self, message: DynMessage, sender: Option<ActorRef>) {
        let envelope = if is_system_message(message.as_ref()) {
            match downcast_into::<DeathWatchNotification>(message) {
                Ok(notification) => Envelope::new(Box::new(Terminated::new(notification.actor)), None),
                Err(_) => return,
            }
        } else {
            Envelope::new(message, sender)
        };
        let _ = self.sender.send(envelope);
    }

    fn parent(&self) -> Option<&ActorRef> {
        None
    }
}

/// Message sink for driving actors from tests.
///
/// Messages sent to [`TestProbe::actor_ref`] are queued and inspected with the
/// `expect_*` methods; the sender of the last expected message is remembered.
pub struct TestProbe {
    actor: ActorRef,
    receiver: tokio::sync::Mutex<UnboundedReceiver<Envelope>>,
    last_sender: Mutex<Option<ActorRef>>,
}

impl TestProbe {
    pub fn new(system: &ActorSystem) -> Self {
        let (tx, rx) = unbounded_channel();
        let path = ActorPath::root(system.name())
            .child("system", ActorPath::undefined_uid())
            .child(random_name("testProbe-"), ActorPath::new_uid());
        let actor = ActorRef::new(ProbeActorRef { path, sender: tx });
        Self {
            actor,
            receiver: tokio::sync::Mutex::new(rx),
            last_sender: Mutex::new(None),
        }
    }

    pub fn actor_ref(&self) -> &ActorRef {
        &self.actor
    }

    pub fn last_sender(&self) -> Option<ActorRef> {
        self.last_sender.lock().clone()
    }

    pub async fn expect_msg<M>(&self, timeout: Duration) -> anyhow::Result<M>
    where
        M: crate::message::Message,
    {
        let mut receiver = self.receiver.lock().await;
        let envelope = tokio::time::timeout(timeout, receiver.recv())
            .await
            .map_err(|_| anyhow!("timeout after {:?} while waiting for {}", timeout, type_name::<M>()))?
            .ok_or_else(|| anyhow!("probe {} closed", self.actor))?;
        let Envelope { message, sender } = envelope;
        *self.last_sender.lock() = sender;
        let name = message.signature();
        downcast_into::<M>(message)
            .map(|message| *message)
            .map_err(|_| anyhow!("expected {}, found {}", type_name::<M>(), name))
    }

    pub async fn expect_no_msg(&self, duration: Duration) -> anyhow::Result<()> {
        let mut receiver = self.receiver.lock().await;
        match tokio::time::timeout(duration, receiver.recv()).await {
            Ok(Some(envelope)) => Err(anyhow!("expected no message, found {}", envelope.name())),
            Ok(None) | Err(_) => Ok(()),
        }
    }

    /// Subscribes the probe to the termination of `actor`.
    pub fn watch(&self, actor: &ActorRef) {
        actor.cast_ns(Watch {
            watchee: actor.clone(),
            watcher: self.actor.clone(),
        });
    }

    pub async fn expect_terminated(&self, actor: &ActorRef, timeout: Duration) -> anyhow::Result<()> {
        let terminated = self.expect_msg::<Terminated>(timeout).await?;
        if &terminated.actor == actor {
            Ok(())
        } else {
            Err(anyhow!("expected {} terminated, found {}", actor, terminated.actor))
        }
    }
}
