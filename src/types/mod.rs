// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ActionId, ButtonStyle, ChannelColor, CommandIndex, ConsoleModel, FeedbackId,
        OptionValue, ParamType, Rgb, ScpValue, SubscriptionId, Verb,
    };
}

pub use {
    colors::{ButtonStyle, ChannelColor, Palette, Rgb},
    ids::{ActionId, CommandIndex, FeedbackId, IdFactory, IdParseError, IsId, SubscriptionId},
    model::{ConsoleModel, ParamType, Verb},
    values::{OptionValue, ScpValue},
};

mod colors;
mod ids;
mod model;
mod values;
