// Copyright (c) 2024 Mike Tsao

//! The wire side of SCP: outbound action invocations become text lines, and
//! inbound lines become typed [ValueRecord]s.
//!
//! Nothing here fails loudly. An invocation that can't be encoded produces no
//! line, and an inbound line that can't be matched decodes to a variant the
//! caller can ignore. Both leave a log line behind.

use crate::prelude::*;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ActionInvocation, ActionInvocationBuilder, DecodedLine, LineFramer, ValueRecord,
    };
}

pub use decode::{decode, DecodedLine, ValueRecord};
pub use encode::{encode, encode_with};
pub use framer::{LineFramer, MAX_LINE_LENGTH};

mod decode;
mod encode;
mod framer;

/// What the host hands over when a user triggers an action: which action,
/// whether to write or query, and the option values from the action's form.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct ActionInvocation {
    #[allow(missing_docs)]
    pub action: ActionId,
    #[allow(missing_docs)]
    #[builder(default)]
    #[serde(default)]
    pub verb: Verb,
    /// First coordinate, 1-based. Negative values name a channel alias slot.
    #[builder(default, setter(into, strip_option))]
    #[serde(rename = "X", default, skip_serializing_if = "Option::is_none")]
    pub x: Option<OptionValue>,
    /// Second coordinate, 1-based, or a scene bank letter.
    #[builder(default, setter(into, strip_option))]
    #[serde(rename = "Y", default, skip_serializing_if = "Option::is_none")]
    pub y: Option<OptionValue>,
    #[allow(missing_docs)]
    #[builder(default, setter(into, strip_option))]
    #[serde(rename = "Val", default, skip_serializing_if = "Option::is_none")]
    pub val: Option<OptionValue>,
}
impl ActionInvocation {
    /// An invocation with no options, e.g. for the macro controls.
    pub fn new(action: ActionId) -> Self {
        Self {
            action,
            verb: Verb::default(),
            x: None,
            y: None,
            val: None,
        }
    }

    /// The query form of this invocation: same coordinates, no value.
    pub fn as_get(&self) -> Self {
        Self {
            verb: Verb::Get,
            val: None,
            ..self.clone()
        }
    }
}

/// Scene banks on TF consoles, 1-based: `a` is 1, `b` is 2. Accepts the
/// letter or the number; anything else means bank `a`.
pub(crate) fn bank_number(value: Option<&OptionValue>) -> u32 {
    match value {
        Some(OptionValue::Text(t)) if t.trim().eq_ignore_ascii_case("b") => 2,
        Some(v) if v.as_number() == Some(2) => 2,
        _ => 1,
    }
}

pub(crate) fn bank_letter(bank: u32) -> char {
    if bank == 2 {
        'b'
    } else {
        'a'
    }
}
