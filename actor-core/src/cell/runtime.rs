use std::any::{type_name, Any};
use std::panic::AssertUnwindSafe;

use tokio::task::yield_now;
use tracing::{debug, error};

use crate::actor::context::ActorContext;
use crate::actor::mailbox::Mailbox;
use crate::actor::receive::Receive;
use crate::actor::state::ActorState;
use crate::actor::Actor;
use crate::cell::envelope::Envelope;
use crate::message::death_watch_notification::DeathWatchNotification;
use crate::message::poison_pill::PoisonPill;
use crate::message::terminate::Terminate;
use crate::message::unwatch::Unwatch;
use crate::message::watch::Watch;
use crate::message::Message;

pub(crate) struct ActorRuntime<A>
where
    A: Actor,
{
    pub(crate) actor: A,
    pub(crate) ctx: ActorContext,
    pub(crate) mailbox: Mailbox,
}

impl<A> ActorRuntime<A>
where
    A: Actor,
{
    pub(crate) async fn run(self) {
        let Self {
            mut actor,
            mut ctx,
            mut mailbox,
        } = self;
        let receive = actor.receive();
        match std::panic::catch_unwind(AssertUnwindSafe(|| actor.started(&mut ctx))) {
            Ok(Ok(_)) => {
                ctx.state = ActorState::Started;
            }
            Ok(Err(error)) => {
                error!("actor {} start error {:?}", type_name::<A>(), error);
                ctx.terminate();
            }
            Err(_) => {
                error!("actor {} start panic", type_name::<A>());
                ctx.terminate();
            }
        }
        let mut throughput = 0;
        while ctx.state != ActorState::CanTerminate {
            tokio::select! {
                biased;
                Some(envelope) = mailbox.system.recv() => {
                    Self::handle_system_message(&mut ctx, &mut actor, &receive, envelope);
                }
                Some(envelope) = mailbox.message.recv(), if ctx.state == ActorState::Started => {
                    Self::handle_message(&mut ctx, &mut actor, &receive, envelope);
                    throughput += 1;
                    if throughput >= mailbox.throughput {
                        throughput = 0;
                        yield_now().await;
                    }
                }
                else => {
                    break;
                }
            }
        }
        match std::panic::catch_unwind(AssertUnwindSafe(|| actor.stopped(&mut ctx))) {
            Ok(Ok(_)) => {}
            Ok(Err(error)) => {
                error!("actor {} stop error {:?}", type_name::<A>(), error);
            }
            Err(_) => {
                error!("actor {} stop panic", type_name::<A>());
            }
        }
        for envelope in mailbox.close() {
            if let Ok(watch) = envelope.message.into_any().downcast::<Watch>() {
                let Watch { watchee, watcher } = *watch;
                ctx.add_watcher(watchee, watcher);
            }
        }
        ctx.tell_watchers_we_died();
        ctx.unwatch_watched_actors();
        ctx.state = ActorState::Terminated;
        debug!("{} terminated", ctx.myself);
    }

    fn handle_message(ctx: &mut ActorContext, actor: &mut A, receive: &Receive<A>, envelope: Envelope) {
        let Envelope { message, sender } = envelope;
        let name = message.signature();
        if name == PoisonPill::signature_sized() {
            debug!("{} receive PoisonPill", ctx.myself);
            ctx.terminate();
            return;
        }
        ctx.sender = sender.clone();
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            receive.receive(actor, ctx, message, sender)
        }));
        match result {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(error))) => {
                error!("{} handle message {} error {:?}", ctx.myself, name, error);
            }
            Ok(Err(message)) => {
                actor.unhandled(ctx, message);
            }
            Err(_) => {
                error!("{} handle message {} panic", ctx.myself, name);
            }
        }
        ctx.sender = None;
    }

    fn handle_system_message(ctx: &mut ActorContext, actor: &mut A, receive: &Receive<A>, envelope: Envelope) {
        let name = envelope.name();
        let message: Box<dyn Any> = envelope.message.into_any();
        let message = match message.downcast::<DeathWatchNotification>() {
            Ok(notification) => {
                if let Some(terminated) = ctx.watched_actor_terminated(notification.actor) {
                    let envelope = Envelope::new(Box::new(terminated), None);
                    Self::handle_message(ctx, actor, receive, envelope);
                }
                return;
            }
            Err(message) => message,
        };
        let message = match message.downcast::<Watch>() {
            Ok(watch) => {
                let Watch { watchee, watcher } = *watch;
                ctx.add_watcher(watchee, watcher);
                return;
            }
            Err(message) => message,
        };
        let message = match message.downcast::<Unwatch>() {
            Ok(unwatch) => {
                let Unwatch { watchee, watcher } = *unwatch;
                ctx.remove_watcher(watchee, watcher);
                return;
            }
            Err(message) => message,
        };
        if message.is::<Terminate>() {
            debug!("{} receive Terminate", ctx.myself);
            ctx.terminate();
        } else {
            error!("{} receive unexpected system message {}", ctx.myself, name);
        }
    }
}
