use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

use crate::error::ActorError;

const BASE64_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+~";
static ACTOR_NAME_OFFSET: AtomicU64 = AtomicU64::new(0);

pub fn init_logger(level: tracing::Level) {
    let format = tracing_subscriber::fmt::format()
        .with_timer(LocalTime::rfc_3339())
        .pretty();
    tracing_subscriber::FmtSubscriber::builder()
        .event_format(format)
        .with_max_level(level)
        .init();
}

pub fn init_logger_with_filter(filter: impl Into<EnvFilter>) {
    let format = tracing_subscriber::fmt::format()
        .with_timer(LocalTime::rfc_3339())
        .pretty()
        .with_file(false);
    tracing_subscriber::FmtSubscriber::builder()
        .event_format(format)
        .with_env_filter(filter)
        .init();
}

pub(crate) fn base64(mut l: u64, mut s: String) -> String {
    loop {
        s.push(BASE64_CHARS[(l & 63) as usize] as char);
        l >>= 6;
        if l == 0 {
            return s;
        }
    }
}

pub(crate) fn random_actor_name() -> String {
    random_name("$")
}

pub(crate) fn random_name(prefix: &str) -> String {
    let num = ACTOR_NAME_OFFSET.fetch_add(1, Ordering::Relaxed);
    base64(num, prefix.to_string())
}

pub(crate) fn check_name(name: &str) -> Result<(), ActorError> {
    let valid = !name.is_empty()
        && name.chars().all(|c| {
            matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '*' | '+' | '%' | '$')
        });
    if valid {
        Ok(())
    } else {
        Err(ActorError::ActorNameInvalid(name.to_string()))
    }
}

/// Builds a valid actor name from an arbitrary id, percent encoding everything
/// outside the allowed name alphabet.
pub fn encode_name(prefix: &str, id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("{prefix}{encoded}")
}

#[cfg(test)]
mod tests {
    use crate::ext::{check_name, encode_name, random_name};

    #[test]
    fn test_encode_name() {
        assert_eq!(encode_name("group-", "group1"), "group-group1");
        let name = encode_name("device-", "a b/c#d");
        assert!(check_name(&name).is_ok(), "{name}");
        assert_ne!(encode_name("group-", "a/b"), encode_name("group-", "a_b"));
    }

    #[test]
    fn test_check_name() {
        assert!(check_name("manager").is_ok());
        assert!(check_name("$a").is_ok());
        assert!(check_name("").is_err());
        assert!(check_name("a/b").is_err());
        assert!(check_name("a#1").is_err());
    }

    #[test]
    fn test_random_name_unique() {
        let a = random_name("$");
        let b = random_name("$");
        assert_ne!(a, b);
        assert!(a.starts_with('$'));
    }
}
