//! Instance configuration
//!
//! [`InstanceBuilder`] assembles arguments, identity strings and an initial
//! log target, then creates the [`Instance`]. [`InstanceConfig`] is the same
//! set of options loaded from TOML:
//!
//! ```toml
//! args = ["--no-video", "--network-caching=300"]
//! log_file = "/var/log/player/vlc.log"
//! minimum_version = "3.0.18"
//!
//! [user_agent]
//! name = "Player"
//! http = "Player/1.0"
//!
//! [app_id]
//! id = "com.example.player"
//! version = "1.0"
//! icon = "player"
//! ```

use crate::core::engine::Engine;
use crate::core::instance::Instance;
use crate::error::{Result, VlcError};
use crate::versioning::VersionId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgent {
    pub name: String,
    pub http: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppId {
    pub id: String,
    pub version: String,
    pub icon: String,
}

/// Instance options as stored in a TOML file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceConfig {
    /// Engine command-line arguments
    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub user_agent: Option<UserAgent>,

    #[serde(default)]
    pub app_id: Option<AppId>,

    /// Append engine logs to this file from creation on
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Refuse engines older than this (e.g. `"3.0.18"`)
    #[serde(default)]
    pub minimum_version: Option<String>,
}

impl InstanceConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading instance config from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Builder for customizing instance creation
///
/// # Examples
///
/// ```rust
/// use vlc_bridge::{InstanceBuilder, LogMode, StubEngine, VersionId};
///
/// # fn main() -> vlc_bridge::Result<()> {
/// let instance = InstanceBuilder::new()
///     .arg("--no-video")
///     .user_agent("Player", "Player/1.0")
///     .minimum_version(VersionId::new(3, 0, 0, 0))
///     .build::<StubEngine>()?;
/// assert_eq!(instance.log_mode(), LogMode::Disabled);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    args: Vec<String>,
    user_agent: Option<UserAgent>,
    app_id: Option<AppId>,
    log_file: Option<PathBuf>,
    minimum_version: Option<VersionId>,
}

impl InstanceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded [`InstanceConfig`]
    ///
    /// # Errors
    ///
    /// `InvalidVersion` if `minimum_version` does not parse.
    pub fn from_config(config: InstanceConfig) -> Result<Self> {
        let minimum_version = config
            .minimum_version
            .as_deref()
            .map(str::parse::<VersionId>)
            .transpose()?;

        Ok(InstanceBuilder {
            args: config.args,
            user_agent: config.user_agent,
            app_id: config.app_id,
            log_file: config.log_file,
            minimum_version,
        })
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, name: S, http: S) -> Self {
        self.user_agent = Some(UserAgent {
            name: name.into(),
            http: http.into(),
        });
        self
    }

    pub fn app_id<S: Into<String>>(mut self, id: S, version: S, icon: S) -> Self {
        self.app_id = Some(AppId {
            id: id.into(),
            version: version.into(),
            icon: icon.into(),
        });
        self
    }

    pub fn log_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Fail the build if the linked engine reports an older version
    pub fn minimum_version(mut self, version: VersionId) -> Self {
        self.minimum_version = Some(version);
        self
    }

    /// Create the instance
    ///
    /// The engine version is checked before anything is allocated; the
    /// instance is dropped (and released) if a later step fails.
    pub fn build<E: Engine>(self) -> Result<Instance<E>> {
        if let Some(required) = self.minimum_version {
            let found = Instance::<E>::runtime_version()?;
            if found < required {
                return Err(VlcError::UnsupportedEngine {
                    required: required.to_string(),
                    found: found.to_string(),
                });
            }
        }

        info!("Building engine instance with {} argument(s)", self.args.len());
        let mut instance = Instance::<E>::create(&self.args)?;

        if let Some(agent) = &self.user_agent {
            instance.set_user_agent(&agent.name, &agent.http)?;
        }
        if let Some(app) = &self.app_id {
            instance.set_app_id(&app.id, &app.version, &app.icon)?;
        }
        if let Some(path) = &self.log_file {
            instance.log_to_file(path)?;
        }

        Ok(instance)
    }
}
