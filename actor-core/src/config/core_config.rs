use std::collections::HashMap;
use std::path::Path;

use config::builder::DefaultState;
use config::{Environment, File, FileFormat, Source};
use serde::{Deserialize, Serialize};

use crate::config::mailbox::{MailboxConfig, DEFAULT_MAILBOX};
use crate::error::ActorError;
use crate::CORE_CONFIG;

pub const ENV_PREFIX: &str = "ACTOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub mailbox: HashMap<String, MailboxConfig>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let mut mailbox = HashMap::new();
        mailbox.insert(DEFAULT_MAILBOX.to_string(), MailboxConfig::default());
        Self { mailbox }
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Reference config, overridden by an optional toml file, overridden by
    /// `ACTOR__`-prefixed environment variables.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Self::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
    }

    pub fn mailbox(&self, name: Option<&str>) -> Result<&MailboxConfig, ActorError> {
        let name = name.unwrap_or(DEFAULT_MAILBOX);
        self.mailbox
            .get(name)
            .ok_or_else(|| ActorError::MailboxNotFound(name.to_string()))
    }
}

pub struct CoreConfigBuilder {
    builder: config::ConfigBuilder<DefaultState>,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        let builder = config::Config::builder().add_source(File::from_str(CORE_CONFIG, FileFormat::Toml));
        Self { builder }
    }
}

impl CoreConfigBuilder {
    pub fn add_source<T>(self, source: T) -> Self
    where
        T: Source + Send + Sync + 'static,
    {
        Self { builder: self.builder.add_source(source) }
    }

    pub fn build(self) -> anyhow::Result<CoreConfig> {
        let core_config = self.builder.build()?.try_deserialize::<CoreConfig>()?;
        if !core_config.mailbox.contains_key(DEFAULT_MAILBOX) {
            return Err(ActorError::MailboxNotFound(DEFAULT_MAILBOX.to_string()).into());
        }
        Ok(core_config)
    }
}

#[cfg(test)]
mod tests {
    use config::{File, FileFormat};

    use crate::config::core_config::CoreConfig;
    use crate::config::mailbox::MailboxConfig;

    #[test]
    fn test_reference_config() -> anyhow::Result<()> {
        let config = CoreConfig::builder().build()?;
        assert_eq!(config.mailbox(None)?, &MailboxConfig::default());
        assert_eq!(config.mailbox(Some("bounded"))?.capacity, Some(100));
        assert!(config.mailbox(Some("missing")).is_err());
        Ok(())
    }

    #[test]
    fn test_override_config() -> anyhow::Result<()> {
        let user = r#"
            [mailbox.default]
            capacity = 16
            throughput = 2
        "#;
        let config = CoreConfig::builder()
            .add_source(File::from_str(user, FileFormat::Toml))
            .build()?;
        let default = config.mailbox(None)?;
        assert_eq!(default.capacity, Some(16));
        assert_eq!(default.throughput, 2);
        assert_eq!(config.mailbox(Some("bounded"))?.capacity, Some(100));
        Ok(())
    }

    #[test]
    fn test_config_round_trip() -> anyhow::Result<()> {
        let config = CoreConfig::default();
        let text = toml::to_string(&config)?;
        let parsed: CoreConfig = toml::from_str(&text)?;
        assert_eq!(config, parsed);
        Ok(())
    }
}
