pub mod device;
pub mod device_group;
pub mod device_manager;
pub mod registry;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logger() {
    actor_core::ext::init_logger(tracing::Level::DEBUG)
}
