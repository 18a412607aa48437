use ahash::HashMap;
use tracing::{error, info};

use actor_core::actor::context::{ActorContext, Context, ContextExt};
use actor_core::actor::props::Props;
use actor_core::actor::receive::Receive;
use actor_core::actor::Actor;
use actor_core::actor_ref::{ActorRef, ActorRefExt};
use actor_core::message::terminated::Terminated;
use actor_core::Message;

use crate::device::RequestTrackDevice;
use crate::device_group::DeviceGroup;
use crate::registry::ChildRegistry;

pub const GROUP_PREFIX: &str = "group-";

#[derive(Debug, Clone, Message)]
pub struct RequestGroupList {
    pub request_id: i64,
}

#[derive(Debug, Clone, Message)]
pub struct ReplyGroups {
    pub request_id: i64,
    pub groups: HashMap<String, ActorRef>,
}

/// Entry point of the registry. Routes tracking requests to the owning group,
/// creating the group on first use.
#[derive(Debug, Default)]
pub struct DeviceManager {
    groups: ChildRegistry,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn props() -> Props {
        Props::new(|| Ok(Self::new()))
    }

    fn track(&mut self, ctx: &mut ActorContext, request: RequestTrackDevice) {
        let group_id = &request.group_id;
        let result = self
            .groups
            .get_or_spawn(ctx, GROUP_PREFIX, group_id, || DeviceGroup::props(group_id));
        match result {
            Ok((group, created)) => {
                if created {
                    info!("Creating device group actor for {}", group_id);
                }
                ctx.forward(&group, request);
            }
            Err(error) => {
                error!("{} create device group actor for {} failed: {:?}", ctx.myself(), group_id, error);
            }
        }
    }

    fn group_terminated(&mut self, group: &ActorRef) {
        if let Some(group_id) = self.groups.remove_by_ref(group) {
            info!("Device group actor for {} has been terminated", group_id);
        }
    }
}

impl Actor for DeviceManager {
    fn started(&mut self, _ctx: &mut ActorContext) -> anyhow::Result<()> {
        info!("DeviceManager started");
        Ok(())
    }

    fn stopped(&mut self, _ctx: &mut ActorContext) -> anyhow::Result<()> {
        info!("DeviceManager stopped");
        Ok(())
    }

    fn receive(&self) -> Receive<Self> {
        Receive::new()
            .is::<RequestTrackDevice>(|actor: &mut DeviceManager, ctx, message, _| {
                actor.track(ctx, message);
                Ok(())
            })
            .is::<RequestGroupList>(|actor: &mut DeviceManager, ctx, RequestGroupList { request_id }, sender| {
                if let Some(sender) = sender {
                    let reply = ReplyGroups {
                        request_id,
                        groups: actor.groups.snapshot(),
                    };
                    sender.cast(reply, Some(ctx.myself().clone()));
                }
                Ok(())
            })
            .is::<Terminated>(|actor: &mut DeviceManager, _, terminated, _| {
                actor.group_terminated(&terminated);
                Ok(())
            })
    }
}
