use std::any::type_name;
use std::time::Duration;

use anyhow::anyhow;

use crate::actor_ref::deferred_ref::DeferredActorRef;
use crate::actor_ref::{ActorRef, ActorRefExt};
use crate::message::{downcast_into, Message};

#[derive(Debug)]
pub struct Patterns;

impl Patterns {
    /// Sends `message` with a one-shot reply sink as sender and waits for the first reply.
    ///
    /// Fails on timeout, when the message could not be delivered, or when the reply is
    /// not a `Resp`.
    pub async fn ask<Req, Resp>(actor: &ActorRef, message: Req, timeout: Duration) -> anyhow::Result<Resp>
    where
        Req: Message,
        Resp: Message,
    {
        let req = type_name::<Req>();
        let (deferred, rx) = DeferredActorRef::new(actor.path());
        actor.cast(message, Some(deferred.into()));
        let envelope = match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(_)) => {
                return Err(anyhow!("ask {} to {} got no reply, message dropped", req, actor));
            }
            Err(_) => {
                return Err(anyhow!("ask {} to {} timeout after {:?}", req, actor, timeout));
            }
        };
        let name = envelope.name();
        downcast_into::<Resp>(envelope.message)
            .map(|resp| *resp)
            .map_err(|_| anyhow!("ask {} to {} expect reply {}, got {}", req, actor, type_name::<Resp>(), name))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actor_derive::Message;

    use crate::actor::actor_system::ActorSystem;
    use crate::actor::context::Context;
    use crate::actor::props::Props;
    use crate::actor::receive::Receive;
    use crate::actor::Actor;
    use crate::actor_ref::actor_ref_factory::ActorRefFactory;
    use crate::actor_ref::ActorRefExt;
    use crate::config::actor_setting::ActorSetting;
    use crate::config::core_config::CoreConfig;
    use crate::pattern::patterns::Patterns;

    #[derive(Default)]
    struct CounterActor {
        value: i64,
    }

    #[derive(Debug, Message)]
    struct Incr;

    #[derive(Debug, Message)]
    struct Get;

    #[derive(Debug, Message)]
    struct GetRsp(i64);

    #[derive(Debug, Message)]
    struct Ignored;

    impl Actor for CounterActor {
        fn receive(&self) -> Receive<Self> {
            Receive::new()
                .is::<Incr>(|actor: &mut CounterActor, _, _, _| {
                    actor.value += 1;
                    Ok(())
                })
                .is::<Get>(|actor: &mut CounterActor, ctx, _, sender| {
                    if let Some(sender) = sender {
                        sender.cast(GetRsp(actor.value), Some(ctx.myself().clone()));
                    }
                    Ok(())
                })
                .is::<Ignored>(|_: &mut CounterActor, _, _, _| Ok(()))
        }
    }

    #[tokio::test]
    async fn test_ask() -> anyhow::Result<()> {
        let system = ActorSystem::new("mikai233", Default::default())?;
        let counter = system.spawn_anonymous(Props::new(|| Ok(CounterActor::default())))?;
        for _ in 0..1000 {
            counter.cast_ns(Incr);
        }
        let rsp: GetRsp = Patterns::ask(&counter, Get, Duration::from_secs(3)).await?;
        assert_eq!(rsp.0, 1000);
        Ok(())
    }

    #[tokio::test]
    async fn test_ask_timeout() -> anyhow::Result<()> {
        let system = ActorSystem::new("mikai233", Default::default())?;
        let counter = system.spawn_anonymous(Props::new(|| Ok(CounterActor::default())))?;
        let rsp = Patterns::ask::<_, GetRsp>(&counter, Ignored, Duration::from_millis(100)).await;
        assert!(rsp.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_default_mailbox_unbounded() -> anyhow::Result<()> {
        let system = ActorSystem::new("mikai233", Default::default())?;
        let counter = system.spawn_anonymous(Props::new(|| Ok(CounterActor::default())))?;
        for _ in 0..50_000 {
            counter.cast_ns(Incr);
        }
        let rsp: GetRsp = Patterns::ask(&counter, Get, Duration::from_secs(5)).await?;
        assert_eq!(rsp.0, 50_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_bounded_mailbox_drops_overflow() -> anyhow::Result<()> {
        let setting = ActorSetting::builder().config(CoreConfig::builder().build()?).build();
        let system = ActorSystem::new("mikai233", setting)?;
        let props = Props::new(|| Ok(CounterActor::default())).with_mailbox("bounded");
        let counter = system.spawn(props, "bounded-counter")?;
        for _ in 0..1000 {
            counter.cast_ns(Incr);
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        let rsp: GetRsp = Patterns::ask(&counter, Get, Duration::from_secs(3)).await?;
        assert_eq!(rsp.0, 100);
        Ok(())
    }
}
