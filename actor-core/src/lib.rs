pub use actor_derive::Message;

pub mod actor;
pub mod actor_path;
pub mod actor_ref;
pub(crate) mod cell;
pub mod config;
pub mod error;
pub mod ext;
pub mod message;
pub mod pattern;
pub mod testkit;

pub const CORE_CONFIG: &'static str = include_str!("../reference.toml");

#[cfg(test)]
#[ctor::ctor]
fn init_test_logger() {
    ext::init_logger(tracing::Level::DEBUG)
}
