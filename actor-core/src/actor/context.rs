use ahash::{HashSet, HashSetExt};
use tracing::debug;

use crate::actor::actor_system::ActorSystem;
use crate::actor::props::Props;
use crate::actor::state::ActorState;
use crate::actor_ref::actor_ref_factory::ActorRefFactory;
use crate::actor_ref::local_ref::LocalActorRef;
use crate::actor_ref::{ActorRef, ActorRefExt};
use crate::error::ActorError;
use crate::message::death_watch_notification::DeathWatchNotification;
use crate::message::terminate::Terminate;
use crate::message::terminated::Terminated;
use crate::message::unwatch::Unwatch;
use crate::message::watch::Watch;
use crate::message::Message;

pub trait Context: ActorRefFactory {
    fn myself(&self) -> &ActorRef;

    /// Sender of the message currently being handled.
    fn sender(&self) -> Option<&ActorRef>;

    fn children(&self) -> Vec<ActorRef>;

    fn child(&self, name: &str) -> Option<ActorRef>;

    fn parent(&self) -> Option<&ActorRef>;

    /// Subscribes to the termination of `subject`, which arrives as exactly one
    /// [`Terminated`] message.
    fn watch(&mut self, subject: &ActorRef);

    fn unwatch(&mut self, subject: &ActorRef);

    fn is_watching(&self, subject: &ActorRef) -> bool;
}

impl<T: ?Sized> ContextExt for T where T: Context {}

pub trait ContextExt: Context {
    /// Sends `message` to `to` keeping the original sender as the reply target.
    fn forward<M>(&self, to: &ActorRef, message: M)
    where
        M: Message,
    {
        to.cast(message, self.sender().cloned())
    }
}

#[derive(Debug)]
pub struct ActorContext {
    pub(crate) state: ActorState,
    pub(crate) myself: ActorRef,
    pub(crate) local: LocalActorRef,
    pub(crate) sender: Option<ActorRef>,
    pub(crate) system: ActorSystem,
    pub(crate) watching: HashSet<ActorRef>,
    pub(crate) watched_by: HashSet<ActorRef>,
}

impl ActorRefFactory for ActorContext {
    fn system(&self) -> &ActorSystem {
        &self.system
    }

    fn spawn(&self, props: Props, name: impl Into<String>) -> anyhow::Result<ActorRef> {
        self.check_can_spawn()?;
        self.local.attach_child(&self.system, props, Some(name.into()))
    }

    fn spawn_anonymous(&self, props: Props) -> anyhow::Result<ActorRef> {
        self.check_can_spawn()?;
        self.local.attach_child(&self.system, props, None)
    }

    fn stop(&self, actor: &ActorRef) {
        actor.cast_ns(Terminate);
    }
}

impl Context for ActorContext {
    fn myself(&self) -> &ActorRef {
        &self.myself
    }

    fn sender(&self) -> Option<&ActorRef> {
        self.sender.as_ref()
    }

    fn children(&self) -> Vec<ActorRef> {
        self.local.cell.children()
    }

    fn child(&self, name: &str) -> Option<ActorRef> {
        self.local.cell.get_child(name)
    }

    fn parent(&self) -> Option<&ActorRef> {
        self.local.cell.parent()
    }

    fn watch(&mut self, subject: &ActorRef) {
        if subject != &self.myself && self.watching.insert(subject.clone()) {
            let watch = Watch {
                watchee: subject.clone(),
                watcher: self.myself.clone(),
            };
            subject.cast_ns(watch);
        }
    }

    fn unwatch(&mut self, subject: &ActorRef) {
        if subject != &self.myself && self.watching.remove(subject) {
            let unwatch = Unwatch {
                watchee: subject.clone(),
                watcher: self.myself.clone(),
            };
            subject.cast_ns(unwatch);
        }
    }

    fn is_watching(&self, subject: &ActorRef) -> bool {
        self.watching.contains(subject)
    }
}

impl ActorContext {
    pub(crate) fn new(local: LocalActorRef, system: ActorSystem) -> Self {
        Self {
            state: ActorState::Init,
            myself: local.clone().into(),
            local,
            sender: None,
            system,
            watching: HashSet::new(),
            watched_by: HashSet::new(),
        }
    }

    fn check_can_spawn(&self) -> Result<(), ActorError> {
        if matches!(self.state, ActorState::Init | ActorState::Started) {
            Ok(())
        } else {
            Err(ActorError::SpawnWhileTerminating(self.myself.to_string()))
        }
    }

    pub(crate) fn terminate(&mut self) {
        if !matches!(self.state, ActorState::Init | ActorState::Started) {
            return;
        }
        self.state = ActorState::Terminating;
        let children = self.children();
        if children.is_empty() {
            self.finish_terminate();
        } else {
            for child in &children {
                self.stop(child);
            }
        }
    }

    fn finish_terminate(&mut self) {
        self.state = ActorState::CanTerminate;
    }

    /// Handles a death notification, returning the [`Terminated`] to hand to the actor
    /// when it was watching. Repeated notifications for the same actor yield nothing.
    pub(crate) fn watched_actor_terminated(&mut self, actor: ActorRef) -> Option<Terminated> {
        let watched = self.watching.remove(&actor);
        if self.local.cell.remove_child(&actor) {
            debug!("{} child {} terminated", self.myself, actor);
            if self.state == ActorState::Terminating && !self.local.cell.has_children() {
                self.finish_terminate();
            }
        }
        if watched && self.state == ActorState::Started {
            Some(Terminated::new(actor))
        } else {
            None
        }
    }

    pub(crate) fn add_watcher(&mut self, watchee: ActorRef, watcher: ActorRef) {
        if watchee == self.myself && watcher != self.myself {
            if self.watched_by.insert(watcher.clone()) {
                debug!("{} is watched by {}", self.myself, watcher);
            }
        } else {
            debug!("illegal Watch({},{}) for {}", watchee, watcher, self.myself);
        }
    }

    pub(crate) fn remove_watcher(&mut self, watchee: ActorRef, watcher: ActorRef) {
        if watchee == self.myself && self.watched_by.remove(&watcher) {
            debug!("{} no longer watched by {}", self.myself, watcher);
        }
    }

    pub(crate) fn tell_watchers_we_died(&mut self) {
        let parent = self.parent().cloned();
        if let Some(parent) = &parent {
            parent.cast_ns(DeathWatchNotification {
                actor: self.myself.clone(),
            });
        }
        for watcher in self.watched_by.drain() {
            if parent.as_ref() != Some(&watcher) {
                debug!("{} tell watcher {} we died", self.myself, watcher);
                watcher.cast_ns(DeathWatchNotification {
                    actor: self.myself.clone(),
                });
            }
        }
    }

    pub(crate) fn unwatch_watched_actors(&mut self) {
        for watchee in self.watching.drain() {
            let unwatch = Unwatch {
                watchee: watchee.clone(),
                watcher: self.myself.clone(),
            };
            watchee.cast_ns(unwatch);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actor_derive::Message;

    use crate::actor::actor_system::ActorSystem;
    use crate::actor::context::{ActorContext, Context, ContextExt};
    use crate::actor::props::Props;
    use crate::actor::receive::Receive;
    use crate::actor::Actor;
    use crate::actor_ref::actor_ref_factory::ActorRefFactory;
    use crate::actor_ref::{ActorRef, ActorRefExt};
    use crate::message::death_watch_notification::DeathWatchNotification;
    use crate::message::terminated::Terminated;
    use crate::testkit::probe::TestProbe;

    #[derive(Debug, Message)]
    struct Ping(i64);

    #[derive(Debug, Message)]
    struct Pong(i64);

    struct EchoActor;

    impl Actor for EchoActor {
        fn receive(&self) -> Receive<Self> {
            Receive::new().is::<Ping>(|_: &mut EchoActor, ctx, Ping(n), sender| {
                if let Some(sender) = sender {
                    sender.cast(Pong(n), Some(ctx.myself().clone()));
                }
                Ok(())
            })
        }
    }

    struct ForwardActor {
        echo: Option<ActorRef>,
    }

    impl Actor for ForwardActor {
        fn started(&mut self, ctx: &mut ActorContext) -> anyhow::Result<()> {
            self.echo = Some(ctx.spawn(Props::new(|| Ok(EchoActor)), "echo")?);
            Ok(())
        }

        fn receive(&self) -> Receive<Self> {
            Receive::new().is::<Ping>(|actor: &mut ForwardActor, ctx, ping, _| {
                if let Some(echo) = &actor.echo {
                    ctx.forward(echo, ping);
                }
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn test_forward_keeps_sender() -> anyhow::Result<()> {
        let system = ActorSystem::new("mikai233", Default::default())?;
        let probe = TestProbe::new(&system);
        let forwarder = system.spawn(Props::new(|| Ok(ForwardActor { echo: None })), "forwarder")?;
        forwarder.cast(Ping(-7), Some(probe.actor_ref().clone()));
        let Pong(n) = probe.expect_msg::<Pong>(Duration::from_secs(3)).await?;
        assert_eq!(n, -7);
        let echo = probe.last_sender().ok_or_else(|| anyhow::anyhow!("no sender"))?;
        assert_ne!(echo, forwarder);
        assert_eq!(echo.parent(), Some(&forwarder));
        Ok(())
    }

    #[derive(Debug, Message)]
    struct WatchIt(ActorRef);

    #[derive(Debug, Message)]
    struct Observed(ActorRef);

    struct WatcherActor {
        reporter: ActorRef,
    }

    impl Actor for WatcherActor {
        fn receive(&self) -> Receive<Self> {
            Receive::new()
                .is::<WatchIt>(|_: &mut WatcherActor, ctx, WatchIt(subject), _| {
                    ctx.watch(&subject);
                    ctx.watch(&subject);
                    Ok(())
                })
                .is::<Terminated>(|actor: &mut WatcherActor, ctx, terminated, _| {
                    assert!(!ctx.is_watching(&terminated.actor));
                    actor.reporter.cast_ns(Observed(terminated.actor));
                    Ok(())
                })
        }
    }

    #[tokio::test]
    async fn test_watch_delivers_terminated_once() -> anyhow::Result<()> {
        let system = ActorSystem::new("mikai233", Default::default())?;
        let probe = TestProbe::new(&system);
        let reporter = probe.actor_ref().clone();
        let watcher = system.spawn(Props::new(move || Ok(WatcherActor { reporter })), "watcher")?;
        let target = system.spawn(Props::new(|| Ok(EchoActor)), "target")?;
        watcher.cast_ns(WatchIt(target.clone()));
        target.cast(Ping(1), Some(probe.actor_ref().clone()));
        probe.expect_msg::<Pong>(Duration::from_secs(3)).await?;
        target.stop();
        let Observed(actor) = probe.expect_msg::<Observed>(Duration::from_secs(3)).await?;
        assert_eq!(actor, target);
        watcher.cast_ns(DeathWatchNotification { actor: target.clone() });
        probe.expect_no_msg(Duration::from_millis(300)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_watch_stopped_actor() -> anyhow::Result<()> {
        let system = ActorSystem::new("mikai233", Default::default())?;
        let probe = TestProbe::new(&system);
        let target = system.spawn(Props::new(|| Ok(EchoActor)), "target")?;
        probe.watch(&target);
        system.stop(&target);
        probe.expect_terminated(&target, Duration::from_secs(3)).await?;
        let reporter = probe.actor_ref().clone();
        let watcher = system.spawn(Props::new(move || Ok(WatcherActor { reporter })), "watcher")?;
        watcher.cast_ns(WatchIt(target.clone()));
        let Observed(actor) = probe.expect_msg::<Observed>(Duration::from_secs(3)).await?;
        assert_eq!(actor, target);
        Ok(())
    }

    #[tokio::test]
    async fn test_poison_pill_after_pending_messages() -> anyhow::Result<()> {
        let system = ActorSystem::new("mikai233", Default::default())?;
        let probe = TestProbe::new(&system);
        let target = system.spawn(Props::new(|| Ok(EchoActor)), "target")?;
        probe.watch(&target);
        for n in 0..3 {
            target.cast(Ping(n), Some(probe.actor_ref().clone()));
        }
        target.stop();
        for n in 0..3 {
            let Pong(m) = probe.expect_msg::<Pong>(Duration::from_secs(3)).await?;
            assert_eq!(m, n);
        }
        probe.expect_terminated(&target, Duration::from_secs(3)).await?;
        target.cast(Ping(4), Some(probe.actor_ref().clone()));
        probe.expect_no_msg(Duration::from_millis(200)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_respawn_same_name_is_new_incarnation() -> anyhow::Result<()> {
        let system = ActorSystem::new("mikai233", Default::default())?;
        let probe = TestProbe::new(&system);
        let first = system.spawn(Props::new(|| Ok(EchoActor)), "echo")?;
        probe.watch(&first);
        first.stop();
        probe.expect_terminated(&first, Duration::from_secs(3)).await?;
        let second = tokio::time::timeout(Duration::from_secs(3), async {
            loop {
                match system.spawn(Props::new(|| Ok(EchoActor)), "echo") {
                    Ok(actor) => break actor,
                    Err(_) => tokio::time::sleep(Duration::from_millis(20)).await,
                }
            }
        })
        .await?;
        assert_ne!(first, second);
        assert_eq!(first.path().name(), second.path().name());
        Ok(())
    }
}
