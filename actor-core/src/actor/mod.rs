use tracing::warn;

use crate::actor::context::{ActorContext, Context};
use crate::actor::receive::Receive;
use crate::message::DynMessage;

pub mod actor_system;
pub mod context;
pub(crate) mod mailbox;
pub mod props;
pub mod receive;
pub(crate) mod state;
pub(crate) mod user_guardian;

/// An actor handles one message at a time on its own task. State behind `&mut self`
/// is never touched from anywhere else.
pub trait Actor: Send + Sized + 'static {
    #[allow(unused_variables)]
    fn started(&mut self, ctx: &mut ActorContext) -> anyhow::Result<()> {
        Ok(())
    }

    #[allow(unused_variables)]
    fn stopped(&mut self, ctx: &mut ActorContext) -> anyhow::Result<()> {
        Ok(())
    }

    fn receive(&self) -> Receive<Self>;

    #[allow(unused_variables)]
    fn unhandled(&mut self, ctx: &mut ActorContext, message: DynMessage) {
        warn!("{} unhandled message {:?}", ctx.myself(), message);
    }
}
