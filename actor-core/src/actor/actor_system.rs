use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::info;

use crate::actor::context::ActorContext;
use crate::actor::props::Props;
use crate::actor::user_guardian::UserGuardian;
use crate::actor_path::ActorPath;
use crate::actor_ref::actor_ref_factory::ActorRefFactory;
use crate::actor_ref::local_ref::LocalActorRef;
use crate::actor_ref::{ActorRef, ActorRefExt};
use crate::cell::runtime::ActorRuntime;
use crate::config::actor_setting::ActorSetting;
use crate::config::core_config::CoreConfig;
use crate::error::ActorError;
use crate::message::terminate::Terminate;

#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

pub struct SystemInner {
    name: String,
    start_time: u128,
    config: CoreConfig,
    handle: Handle,
    guardian: LocalActorRef,
    /// Read-locked for the whole of a top-level spawn.
    terminating: RwLock<bool>,
    termination: Mutex<Option<oneshot::Receiver<()>>>,
}

impl Debug for ActorSystem {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("ActorSystem")
            .field("name", &self.name)
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Deref for ActorSystem {
    type Target = Arc<SystemInner>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl ActorSystem {
    /// Starts the system on the handle from the setting, or on the runtime the caller
    /// runs in.
    pub fn new(name: impl Into<String>, setting: ActorSetting) -> anyhow::Result<Self> {
        let ActorSetting { config, handle } = setting;
        let handle = match handle {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| ActorError::NoRuntime)?,
        };
        let name = name.into();
        let (sender, mailbox) = config.mailbox(None)?.channel();
        let path = ActorPath::root(&name).child("user", ActorPath::new_uid());
        let guardian = LocalActorRef::new(path, sender, None);
        let (tx, rx) = oneshot::channel();
        let inner = SystemInner {
            name,
            start_time: SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis(),
            config,
            handle,
            guardian: guardian.clone(),
            terminating: RwLock::new(false),
            termination: Mutex::new(Some(rx)),
        };
        let system = Self { inner: inner.into() };
        let runtime = ActorRuntime {
            actor: UserGuardian::new(tx),
            ctx: ActorContext::new(guardian, system.clone()),
            mailbox,
        };
        system.handle.spawn(runtime.run());
        info!("actor system {} started", system.name);
        Ok(system)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> u128 {
        self.start_time
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Stops every actor, children before parents.
    pub fn terminate(&self) {
        let mut terminating = self.terminating.write();
        if !*terminating {
            *terminating = true;
            info!("actor system {} terminating", self.name);
            self.guardian.cast_ns(Terminate);
        }
    }

    /// Resolves once the user guardian and with it every actor has stopped.
    pub async fn wait_termination(&self) {
        let rx = self.termination.lock().take();
        if let Some(rx) = rx {
            let _ = rx.await;
        }
    }

    fn attach_child(&self, props: Props, name: Option<String>) -> anyhow::Result<ActorRef> {
        let terminating = self.terminating.read();
        if *terminating {
            return Err(ActorError::SpawnWhileTerminating(self.name.clone()).into());
        }
        self.guardian.attach_child(self, props, name)
    }
}

impl ActorRefFactory for ActorSystem {
    fn system(&self) -> &ActorSystem {
        self
    }

    fn spawn(&self, props: Props, name: impl Into<String>) -> anyhow::Result<ActorRef> {
        self.attach_child(props, Some(name.into()))
    }

    fn spawn_anonymous(&self, props: Props) -> anyhow::Result<ActorRef> {
        self.attach_child(props, None)
    }

    fn stop(&self, actor: &ActorRef) {
        actor.cast_ns(Terminate);
    }
}
