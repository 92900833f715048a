// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Names the option slots that actions and feedbacks can carry. The string
/// forms are the keys the host uses in its option maps.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
pub enum OptionKey {
    /// First coordinate, usually a channel.
    X,
    /// Second coordinate, usually a mix bus or a scene bank.
    Y,
    /// The value to write or expect.
    Val,
    /// Foreground colour of a matched feedback.
    #[serde(rename = "fg")]
    #[strum(serialize = "fg")]
    Fg,
    /// Background colour of a matched feedback.
    #[serde(rename = "bg")]
    #[strum(serialize = "bg")]
    Bg,
}

/// One entry in a dropdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// What the host hands back when the entry is picked.
    pub id: OptionValue,
    /// What the host shows.
    pub label: String,
}
impl Choice {
    #[allow(missing_docs)]
    pub fn new(id: impl Into<OptionValue>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The shape of an option's input control.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OptionKind {
    Number { min: i64, max: i64, default: i64 },
    Checkbox { default: bool },
    TextInput { default: String },
    Dropdown { choices: Vec<Choice>, default: OptionValue },
    ColorPicker { default: Rgb },
}

/// One labelled input in an action or feedback form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionField {
    #[allow(missing_docs)]
    pub id: OptionKey,
    #[allow(missing_docs)]
    pub label: String,
    #[allow(missing_docs)]
    #[serde(flatten)]
    pub kind: OptionKind,
}
impl OptionField {
    /// A bounded integer input. A default outside the bounds is pulled in.
    pub fn number(id: OptionKey, label: &str, min: i64, max: i64, default: i64) -> Self {
        let default = if min <= max {
            default.clamp(min, max)
        } else {
            default
        };
        Self {
            id,
            label: label.to_string(),
            kind: OptionKind::Number { min, max, default },
        }
    }

    #[allow(missing_docs)]
    pub fn checkbox(id: OptionKey, label: &str, default: bool) -> Self {
        Self {
            id,
            label: label.to_string(),
            kind: OptionKind::Checkbox { default },
        }
    }

    #[allow(missing_docs)]
    pub fn text(id: OptionKey, label: &str, default: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
            kind: OptionKind::TextInput {
                default: default.to_string(),
            },
        }
    }

    /// A dropdown. If `default` isn't among the choices, the first choice
    /// becomes the default.
    pub fn dropdown(id: OptionKey, label: &str, choices: Vec<Choice>, default: OptionValue) -> Self {
        let default = if choices.iter().any(|c| c.id == default) {
            default
        } else {
            choices.first().map(|c| c.id.clone()).unwrap_or(default)
        };
        Self {
            id,
            label: label.to_string(),
            kind: OptionKind::Dropdown { choices, default },
        }
    }

    #[allow(missing_docs)]
    pub fn color(id: OptionKey, label: &str, default: Rgb) -> Self {
        Self {
            id,
            label: label.to_string(),
            kind: OptionKind::ColorPicker { default },
        }
    }

    /// The value the host should prefill.
    pub fn default_value(&self) -> OptionValue {
        match &self.kind {
            OptionKind::Number { default, .. } => OptionValue::Number(*default),
            OptionKind::Checkbox { default } => OptionValue::Bool(*default),
            OptionKind::TextInput { default } => OptionValue::Text(default.clone()),
            OptionKind::Dropdown { default, .. } => default.clone(),
            OptionKind::ColorPicker { default } => OptionValue::Number(i64::from(default.0)),
        }
    }

    /// The dropdown entries, if this is a dropdown.
    pub fn choices(&self) -> Option<&[Choice]> {
        match &self.kind {
            OptionKind::Dropdown { choices, .. } => Some(choices),
            _ => None,
        }
    }
}
