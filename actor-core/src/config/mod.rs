pub mod actor_setting;
pub mod core_config;
pub mod mailbox;
