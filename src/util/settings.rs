// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about a console connection.
//! Intended to be serialized.

use crate::{error::ScpError, prelude::*};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The port consoles listen on for SCP.
pub const DEFAULT_SCP_PORT: u16 = 49280;

/// How many named-channel slots the user can configure.
pub const CHANNEL_ALIAS_COUNT: usize = 4;

/// What happens to cached parameter values when the connection drops and
/// comes back. A dictionary reload always clears the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// Start every connection from an empty cache.
    #[default]
    ClearOnReconnect,
    /// Keep showing the last known values until the console reports new ones.
    Retain,
}

/// One user-assignable channel slot. Actions and feedbacks refer to slot N
/// with the channel number `-N`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChannelAlias {
    /// What the dropdown shows for this slot.
    #[serde(default)]
    pub name: String,
    /// The 1-based channel the slot currently stands for.
    #[serde(default)]
    pub channel: Option<u32>,
}

/// The table of [ChannelAlias] slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelAliases(pub [ChannelAlias; CHANNEL_ALIAS_COUNT]);
impl ChannelAliases {
    /// Resolves a channel option. Non-negative values pass through; `-1`
    /// through `-4` are looked up in the table. Returns [None] for an unset
    /// slot or an out-of-range sentinel.
    pub fn resolve(&self, channel: i64) -> Option<i64> {
        if channel >= 0 {
            return Some(channel);
        }
        let slot = usize::try_from(channel.unsigned_abs()).ok()?.checked_sub(1)?;
        self.0
            .get(slot)
            .and_then(|alias| alias.channel)
            .map(i64::from)
    }

    /// The display name of each slot, paired with its sentinel value.
    pub fn labels(&self) -> impl Iterator<Item = (i64, String)> + '_ {
        self.0.iter().enumerate().map(|(i, alias)| {
            let sentinel = -(i as i64 + 1);
            let label = if alias.name.is_empty() {
                format!("Alias {}", i + 1)
            } else {
                alias.name.clone()
            };
            (sentinel, label)
        })
    }

    /// Points the given slot (1-based) at a channel.
    pub fn assign(&mut self, slot: usize, channel: Option<u32>) -> bool {
        match slot.checked_sub(1).and_then(|i| self.0.get_mut(i)) {
            Some(alias) => {
                alias.channel = channel;
                true
            }
            None => false,
        }
    }
}

/// Contains persistent settings for one console connection.
#[derive(Clone, Debug, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct ScpSettings {
    #[serde(default)]
    pub(crate) host: String,
    #[derivative(Default(value = "DEFAULT_SCP_PORT"))]
    #[serde(default = "default_port")]
    pub(crate) port: u16,
    #[serde(default)]
    pub(crate) model: ConsoleModel,
    /// Overrides the bundled dictionary for the model.
    #[serde(default)]
    pub(crate) dictionary_path: Option<PathBuf>,
    #[serde(default)]
    pub(crate) channel_aliases: ChannelAliases,
    #[serde(default)]
    pub(crate) cache_policy: CachePolicy,

    #[serde(skip)]
    has_been_saved: bool,
}
fn default_port() -> u16 {
    DEFAULT_SCP_PORT
}
impl HasSettings for ScpSettings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
#[allow(missing_docs)]
impl ScpSettings {
    /// Creates settings for the given console.
    pub fn new_with(host: &str, model: ConsoleModel) -> Self {
        Self {
            host: host.to_string(),
            model,
            ..Default::default()
        }
    }

    /// Reads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScpError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Self = serde_json::from_str(&json)?;
        settings.mark_clean();
        Ok(settings)
    }

    /// Writes settings to a JSON file and marks them clean.
    pub fn save(&mut self, path: &Path) -> Result<(), ScpError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ScpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.mark_clean();
        Ok(())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, ready for a socket connect.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn model(&self) -> ConsoleModel {
        self.model
    }

    pub fn dictionary_path(&self) -> Option<&Path> {
        self.dictionary_path.as_deref()
    }

    pub fn channel_aliases(&self) -> &ChannelAliases {
        &self.channel_aliases
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_host(&mut self, host: &str) {
        if host != self.host {
            self.host = host.to_string();
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_port(&mut self, port: u16) {
        if port != self.port {
            self.port = port;
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_model(&mut self, model: ConsoleModel) {
        if model != self.model {
            self.model = model;
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_dictionary_path(&mut self, path: Option<PathBuf>) {
        if path != self.dictionary_path {
            self.dictionary_path = path;
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_cache_policy(&mut self, policy: CachePolicy) {
        if policy != self.cache_policy {
            self.cache_policy = policy;
            self.needs_save();
        }
    }

    /// Points an alias slot (1-based) at a channel and marks the struct
    /// eligible to save.
    pub fn set_channel_alias(&mut self, slot: usize, name: &str, channel: Option<u32>) {
        let Some(alias) = slot
            .checked_sub(1)
            .and_then(|i| self.channel_aliases.0.get_mut(i))
        else {
            log::warn!("no channel alias slot {slot}");
            return;
        };
        if alias.name != name || alias.channel != channel {
            alias.name = name.to_string();
            alias.channel = channel;
            self.needs_save();
        }
    }
}
