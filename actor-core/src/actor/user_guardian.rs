use tokio::sync::oneshot;
use tracing::info;

use crate::actor::context::{ActorContext, Context};
use crate::actor::receive::Receive;
use crate::actor::Actor;

/// Parent of every actor spawned through the system.
pub(crate) struct UserGuardian {
    signal: Option<oneshot::Sender<()>>,
}

impl UserGuardian {
    pub(crate) fn new(signal: oneshot::Sender<()>) -> Self {
        Self { signal: Some(signal) }
    }
}

impl Actor for UserGuardian {
    fn stopped(&mut self, ctx: &mut ActorContext) -> anyhow::Result<()> {
        info!("{} stopped, actor system terminated", ctx.myself());
        if let Some(signal) = self.signal.take() {
            let _ = signal.send(());
        }
        Ok(())
    }

    fn receive(&self) -> Receive<Self> {
        Receive::new()
    }
}
