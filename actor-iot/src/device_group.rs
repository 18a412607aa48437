use ahash::HashMap;
use tracing::{error, info, warn};

use actor_core::actor::context::{ActorContext, Context, ContextExt};
use actor_core::actor::props::Props;
use actor_core::actor::receive::Receive;
use actor_core::actor::Actor;
use actor_core::actor_ref::{ActorRef, ActorRefExt};
use actor_core::message::terminated::Terminated;
use actor_core::Message;

use crate::device::{Device, RequestTrackDevice};
use crate::registry::ChildRegistry;

pub const DEVICE_PREFIX: &str = "device-";

#[derive(Debug, Clone, Message)]
pub struct RequestDeviceList {
    pub request_id: i64,
}

#[derive(Debug, Clone, Message)]
pub struct ReplyDeviceList {
    pub request_id: i64,
    pub devices: HashMap<String, ActorRef>,
}

/// Owns the devices of one group.
#[derive(Debug)]
pub struct DeviceGroup {
    group_id: String,
    devices: ChildRegistry,
}

impl DeviceGroup {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            devices: ChildRegistry::new(),
        }
    }

    pub fn props(group_id: impl Into<String>) -> Props {
        let group = Self::new(group_id);
        Props::new(move || Ok(group))
    }

    fn track(&mut self, ctx: &mut ActorContext, request: RequestTrackDevice) {
        if request.group_id != self.group_id {
            warn!(
                "Ignoring TrackDevice request for {}. This actor is responsible for {}.",
                request.group_id, self.group_id
            );
            return;
        }
        let group_id = &self.group_id;
        let device_id = &request.device_id;
        let result = self
            .devices
            .get_or_spawn(ctx, DEVICE_PREFIX, device_id, || Device::props(group_id, device_id));
        match result {
            Ok((device, created)) => {
                if created {
                    info!("Creating device actor for {}", device_id);
                }
                ctx.forward(&device, request);
            }
            Err(error) => {
                error!("{} create device actor for {} failed: {:?}", ctx.myself(), device_id, error);
            }
        }
    }

    fn device_terminated(&mut self, device: &ActorRef) {
        if let Some(device_id) = self.devices.remove_by_ref(device) {
            info!("Device actor for {} has been terminated", device_id);
        }
    }
}

impl Actor for DeviceGroup {
    fn started(&mut self, _ctx: &mut ActorContext) -> anyhow::Result<()> {
        info!("DeviceGroup {} started", self.group_id);
        Ok(())
    }

    fn stopped(&mut self, _ctx: &mut ActorContext) -> anyhow::Result<()> {
        info!("DeviceGroup {} stopped", self.group_id);
        Ok(())
    }

    fn receive(&self) -> Receive<Self> {
        Receive::new()
            .is::<RequestTrackDevice>(|actor: &mut DeviceGroup, ctx, message, _| {
                actor.track(ctx, message);
                Ok(())
            })
            .is::<RequestDeviceList>(|actor: &mut DeviceGroup, ctx, RequestDeviceList { request_id }, sender| {
                if let Some(sender) = sender {
                    let reply = ReplyDeviceList {
                        request_id,
                        devices: actor.devices.snapshot(),
                    };
                    sender.cast(reply, Some(ctx.myself().clone()));
                }
                Ok(())
            })
            .is::<Terminated>(|actor: &mut DeviceGroup, _, terminated, _| {
                actor.device_terminated(&terminated);
                Ok(())
            })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actor_core::actor::actor_system::ActorSystem;
    use actor_core::actor_ref::actor_ref_factory::ActorRefFactory;
    use actor_core::actor_ref::{ActorRef, ActorRefExt};
    use actor_core::pattern::patterns::Patterns;
    use actor_core::testkit::await_assert;
    use actor_core::testkit::probe::TestProbe;

    use crate::device::{DeviceRegistered, ReadTemperature, RequestTrackDevice, RespondTemperature};
    use crate::device_group::{DeviceGroup, ReplyDeviceList, RequestDeviceList};

    const TIMEOUT: Duration = Duration::from_secs(3);

    async fn track(probe: &TestProbe, group: &ActorRef, group_id: &str, device_id: &str) -> anyhow::Result<ActorRef> {
        group.cast(RequestTrackDevice::new(group_id, device_id), Some(probe.actor_ref().clone()));
        probe.expect_msg::<DeviceRegistered>(TIMEOUT).await?;
        probe
            .last_sender()
            .ok_or_else(|| anyhow::anyhow!("DeviceRegistered without sender"))
    }

    async fn device_ids(group: &ActorRef, request_id: i64) -> anyhow::Result<Vec<String>> {
        let reply = Patterns::ask::<_, ReplyDeviceList>(group, RequestDeviceList { request_id }, TIMEOUT).await?;
        anyhow::ensure!(reply.request_id == request_id, "request id {} not echoed", request_id);
        let mut ids: Vec<String> = reply.devices.into_keys().collect();
        ids.sort();
        Ok(ids)
    }

    #[tokio::test]
    async fn test_register_device() -> anyhow::Result<()> {
        let system = ActorSystem::new("iot", Default::default())?;
        let probe = TestProbe::new(&system);
        let group = system.spawn(DeviceGroup::props("group"), "group")?;
        let device1 = track(&probe, &group, "group", "device1").await?;
        let device2 = track(&probe, &group, "group", "device2").await?;
        assert_ne!(device1, device2);
        assert_eq!(device1.parent(), Some(&group));
        let respond = Patterns::ask::<_, RespondTemperature>(&device1, ReadTemperature { request_id: 0 }, TIMEOUT).await?;
        assert_eq!(respond.value, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_ignore_other_group() -> anyhow::Result<()> {
        let system = ActorSystem::new("iot", Default::default())?;
        let probe = TestProbe::new(&system);
        let group = system.spawn(DeviceGroup::props("group"), "group")?;
        group.cast(RequestTrackDevice::new("wrongGroup", "device1"), Some(probe.actor_ref().clone()));
        probe.expect_no_msg(Duration::from_millis(500)).await?;
        assert!(device_ids(&group, 1).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_return_same_device() -> anyhow::Result<()> {
        let system = ActorSystem::new("iot", Default::default())?;
        let probe = TestProbe::new(&system);
        let group = system.spawn(DeviceGroup::props("group"), "group")?;
        let device1 = track(&probe, &group, "group", "device1").await?;
        let device2 = track(&probe, &group, "group", "device1").await?;
        assert_eq!(device1, device2);
        assert_eq!(device_ids(&group, 7).await?, vec!["device1"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_active_devices() -> anyhow::Result<()> {
        let system = ActorSystem::new("iot", Default::default())?;
        let probe = TestProbe::new(&system);
        let group = system.spawn(DeviceGroup::props("group"), "group")?;
        track(&probe, &group, "group", "device1").await?;
        track(&probe, &group, "group", "device2").await?;
        assert_eq!(device_ids(&group, 0).await?, vec!["device1", "device2"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_after_device_stopped() -> anyhow::Result<()> {
        let system = ActorSystem::new("iot", Default::default())?;
        let probe = TestProbe::new(&system);
        let group = system.spawn(DeviceGroup::props("group"), "group")?;
        let device1 = track(&probe, &group, "group", "device1").await?;
        track(&probe, &group, "group", "device2").await?;
        assert_eq!(device_ids(&group, 0).await?, vec!["device1", "device2"]);

        probe.watch(&device1);
        device1.stop();
        probe.expect_terminated(&device1, TIMEOUT).await?;
        let group_ref = &group;
        await_assert(
            move || async move {
                let ids = device_ids(group_ref, 1).await?;
                anyhow::ensure!(ids == vec!["device2"], "devices {:?}", ids);
                Ok(())
            },
            TIMEOUT,
            Duration::from_millis(100),
        )
        .await?;

        let device1_again = track(&probe, &group, "group", "device1").await?;
        assert_ne!(device1, device1_again);
        assert_eq!(device_ids(&group, 2).await?, vec!["device1", "device2"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_device_ids_with_reserved_characters() -> anyhow::Result<()> {
        let system = ActorSystem::new("iot", Default::default())?;
        let probe = TestProbe::new(&system);
        let group = system.spawn(DeviceGroup::props("group"), "group")?;
        let slash = track(&probe, &group, "group", "a/b").await?;
        let space = track(&probe, &group, "group", "a b").await?;
        let empty = track(&probe, &group, "group", "").await?;
        assert_ne!(slash, space);
        assert_ne!(space, empty);
        assert_eq!(device_ids(&group, 3).await?, vec!["", "a b", "a/b"]);
        Ok(())
    }
}
