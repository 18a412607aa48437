use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use futures::future::try_join_all;
use itertools::Itertools;
use rand::Rng;
use tracing::info;

use actor_core::actor::actor_system::ActorSystem;
use actor_core::actor_ref::actor_ref_factory::ActorRefFactory;
use actor_core::actor_ref::ActorRef;
use actor_core::config::actor_setting::ActorSetting;
use actor_core::config::core_config::CoreConfig;
use actor_core::ext::init_logger_with_filter;
use actor_core::pattern::patterns::Patterns;
use actor_core::testkit::await_assert;
use actor_iot::device::{
    DeviceRegistered, ReadTemperature, RecordTemperature, RequestTrackDevice, RespondTemperature, TemperatureRecorded,
};
use actor_iot::device_group::{ReplyDeviceList, RequestDeviceList};
use actor_iot::device_manager::{DeviceManager, ReplyGroups, RequestGroupList};

const TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long, default_value = "iot")]
    system_name: String,
    #[arg(short, long, default_value_t = 3)]
    groups: usize,
    #[arg(short, long, default_value_t = 4)]
    devices: usize,
    #[arg(short, long, default_value = "info")]
    log_level: String,
    #[arg(short, long)]
    config: Option<PathBuf>,
}

async fn list_groups(manager: &ActorRef, request_id: i64) -> anyhow::Result<Vec<String>> {
    let reply = Patterns::ask::<_, ReplyGroups>(manager, RequestGroupList { request_id }, TIMEOUT).await?;
    Ok(reply.groups.into_keys().sorted().collect())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger_with_filter(args.log_level.as_str());
    let config = CoreConfig::load(args.config.as_deref())?;
    let setting = ActorSetting::builder().config(config).build();
    let system = ActorSystem::new(args.system_name, setting)?;
    let manager = system.spawn(DeviceManager::props(), "manager")?;

    let tracks = (0..args.groups)
        .cartesian_product(0..args.devices)
        .map(|(group, device)| {
            let request = RequestTrackDevice::new(format!("group{group}"), format!("device{device}"));
            Patterns::ask::<_, DeviceRegistered>(&manager, request, TIMEOUT)
        });
    try_join_all(tracks).await?;
    let groups = list_groups(&manager, 0).await?;
    info!("tracked {} devices in groups {:?}", args.groups * args.devices, groups);

    let reply = Patterns::ask::<_, ReplyGroups>(&manager, RequestGroupList { request_id: 1 }, TIMEOUT).await?;
    let mut request_id = 2;
    for (group_id, group) in reply.groups.iter().sorted_by_key(|(id, _)| id.as_str()) {
        let list = Patterns::ask::<_, ReplyDeviceList>(group, RequestDeviceList { request_id }, TIMEOUT).await?;
        request_id += 1;
        for (device_id, device) in list.devices.iter().sorted_by_key(|(id, _)| id.as_str()) {
            let value = rand::thread_rng().gen_range(-20.0..40.0);
            let record = RecordTemperature { request_id, value };
            Patterns::ask::<_, TemperatureRecorded>(device, record, TIMEOUT).await?;
            let read = ReadTemperature { request_id: request_id + 1 };
            let respond = Patterns::ask::<_, RespondTemperature>(device, read, TIMEOUT).await?;
            request_id += 2;
            info!("{}/{} reads {:?}", group_id, device_id, respond.value);
        }
    }

    if let Some((group_id, group)) = reply.groups.iter().min_by_key(|(id, _)| id.as_str()) {
        info!("stopping {}", group_id);
        group.stop();
        let remaining = groups.len() - 1;
        let manager_ref = &manager;
        await_assert(
            move || async move {
                let groups = list_groups(manager_ref, -1).await?;
                anyhow::ensure!(groups.len() == remaining, "groups {:?}", groups);
                Ok(())
            },
            TIMEOUT,
            Duration::from_millis(100),
        )
        .await?;
    }
    info!("groups after stop {:?}", list_groups(&manager, -2).await?);

    system.terminate();
    system.wait_termination().await;
    Ok(())
}
