use tokio::runtime::Handle;
use typed_builder::TypedBuilder;

use crate::config::core_config::CoreConfig;

#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ActorSetting {
    #[builder(default)]
    pub config: CoreConfig,
    /// Runtime the actors are spawned on, defaults to the current one.
    #[builder(default, setter(strip_option))]
    pub handle: Option<Handle>,
}
