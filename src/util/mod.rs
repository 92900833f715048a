// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::settings::{CachePolicy, ScpSettings};
}

pub use settings::{
    CachePolicy, ChannelAlias, ChannelAliases, ScpSettings, CHANNEL_ALIAS_COUNT, DEFAULT_SCP_PORT,
};

mod settings;
