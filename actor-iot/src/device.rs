use tracing::{info, warn};

use actor_core::actor::context::{ActorContext, Context};
use actor_core::actor::props::Props;
use actor_core::actor::receive::Receive;
use actor_core::actor::Actor;
use actor_core::actor_ref::ActorRefExt;
use actor_core::Message;

/// Asks for `device_id` of `group_id` to be registered. Answered by the device itself
/// with [`DeviceRegistered`], so the reply sender is the device handle.
#[derive(Debug, Clone, Message)]
pub struct RequestTrackDevice {
    pub group_id: String,
    pub device_id: String,
}

impl RequestTrackDevice {
    pub fn new(group_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            device_id: device_id.into(),
        }
    }
}

#[derive(Debug, Clone, Message)]
pub struct DeviceRegistered;

#[derive(Debug, Clone, Message)]
pub struct RecordTemperature {
    pub request_id: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Message)]
pub struct TemperatureRecorded {
    pub request_id: i64,
}

#[derive(Debug, Clone, Message)]
pub struct ReadTemperature {
    pub request_id: i64,
}

#[derive(Debug, Clone, Message)]
pub struct RespondTemperature {
    pub request_id: i64,
    pub value: Option<f64>,
}

#[derive(Debug)]
pub struct Device {
    group_id: String,
    device_id: String,
    last_temperature: Option<f64>,
}

impl Device {
    pub fn new(group_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            device_id: device_id.into(),
            last_temperature: None,
        }
    }

    pub fn props(group_id: impl Into<String>, device_id: impl Into<String>) -> Props {
        let device = Self::new(group_id, device_id);
        Props::new(move || Ok(device))
    }

    fn track(&mut self, ctx: &mut ActorContext, request: RequestTrackDevice) {
        if request.group_id == self.group_id && request.device_id == self.device_id {
            if let Some(sender) = ctx.sender() {
                sender.cast(DeviceRegistered, Some(ctx.myself().clone()));
            }
        } else {
            warn!(
                "Ignoring TrackDevice request for {}-{}. This actor is responsible for {}-{}.",
                request.group_id, request.device_id, self.group_id, self.device_id
            );
        }
    }

    fn record(&mut self, ctx: &mut ActorContext, RecordTemperature { request_id, value }: RecordTemperature) {
        info!("Recorded temperature reading {} with {}", value, request_id);
        self.last_temperature = Some(value);
        if let Some(sender) = ctx.sender() {
            sender.cast(TemperatureRecorded { request_id }, Some(ctx.myself().clone()));
        }
    }

    fn read(&self, ctx: &mut ActorContext, ReadTemperature { request_id }: ReadTemperature) {
        if let Some(sender) = ctx.sender() {
            let respond = RespondTemperature {
                request_id,
                value: self.last_temperature,
            };
            sender.cast(respond, Some(ctx.myself().clone()));
        }
    }
}

impl Actor for Device {
    fn started(&mut self, _ctx: &mut ActorContext) -> anyhow::Result<()> {
        info!("Device actor {}-{} started", self.group_id, self.device_id);
        Ok(())
    }

    fn stopped(&mut self, _ctx: &mut ActorContext) -> anyhow::Result<()> {
        info!("Device actor {}-{} stopped", self.group_id, self.device_id);
        Ok(())
    }

    fn receive(&self) -> Receive<Self> {
        Receive::new()
            .is::<RequestTrackDevice>(|actor: &mut Device, ctx, message, _| {
                actor.track(ctx, message);
                Ok(())
            })
            .is::<RecordTemperature>(|actor: &mut Device, ctx, message, _| {
                actor.record(ctx, message);
                Ok(())
            })
            .is::<ReadTemperature>(|actor: &mut Device, ctx, message, _| {
                actor.read(ctx, message);
                Ok(())
            })
    }
}
