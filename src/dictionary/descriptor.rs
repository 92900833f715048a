// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// One controllable console parameter, as the dictionary file describes it.
/// Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandDescriptor {
    /// Unique per console model.
    pub index: CommandIndex,
    /// Hierarchical path, e.g. `MIXER:Current/InCh/Fader/Level`. Unique per
    /// console model.
    pub address: String,
    /// Size of the X axis; 1 means the parameter has no X axis.
    pub dim_x: u32,
    /// Size of the Y axis; 1 means the parameter has no Y axis.
    pub dim_y: u32,
    #[allow(missing_docs)]
    pub min: i64,
    #[allow(missing_docs)]
    pub max: i64,
    #[allow(missing_docs)]
    pub default: ScpValue,
    #[allow(missing_docs)]
    pub unit: String,
    #[allow(missing_docs)]
    pub param_type: ParamType,
    #[allow(missing_docs)]
    pub ui: String,
    #[allow(missing_docs)]
    pub rw: String,
    #[allow(missing_docs)]
    pub scale: i64,
}

/// How a feedback on this command behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandRole {
    /// Compares the cached value with an expected one.
    Ordinary,
    /// Shows the cached text on the button.
    Name,
    /// Paints the button with the cached channel colour.
    Color,
}

impl CommandDescriptor {
    /// The address with its top-level prefix (everything up to the first `/`)
    /// removed.
    pub fn short_address(&self) -> &str {
        self.address
            .split_once('/')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.address)
    }

    /// A human-readable name for catalog entries.
    pub fn label(&self, model: ConsoleModel) -> String {
        match (model, self.param_type) {
            // TF scenes use a bank-prefixed address that reads badly.
            (ConsoleModel::Tf, ParamType::Scene) => "Scene/Bank".to_string(),
            _ => self.short_address().to_string(),
        }
    }

    /// Orders descriptors for display: by short address, ignoring case.
    pub fn sort_key(&self) -> String {
        self.short_address().to_lowercase()
    }

    #[allow(missing_docs)]
    pub fn role(&self) -> CommandRole {
        if self.address.ends_with("Name") {
            CommandRole::Name
        } else if self.address.ends_with("olor") {
            CommandRole::Color
        } else {
            CommandRole::Ordinary
        }
    }

    /// Whether this is an on/off parameter.
    pub fn is_toggle(&self) -> bool {
        self.param_type == ParamType::Integer && self.max == 1
    }

    #[allow(missing_docs)]
    pub fn has_x_axis(&self) -> bool {
        self.dim_x > 1
    }

    #[allow(missing_docs)]
    pub fn has_y_axis(&self) -> bool {
        self.dim_y > 1
    }

    /// Whether the X axis selects an input channel.
    pub fn is_input_channel_axis(&self) -> bool {
        self.short_address().starts_with("InCh/")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn fader() -> CommandDescriptor {
        CommandDescriptor {
            index: CommandIndex(12),
            address: "MIXER:Current/InCh/Fader/Level".to_string(),
            dim_x: 72,
            dim_y: 1,
            min: 0,
            max: 1000,
            default: ScpValue::Int(0),
            unit: "dB".to_string(),
            param_type: ParamType::Integer,
            ui: "1".to_string(),
            rw: "1".to_string(),
            scale: 1,
        }
    }

    #[test]
    fn labels_drop_top_level_prefix() {
        let d = fader();
        assert_eq!(d.label(ConsoleModel::ClQl), "InCh/Fader/Level");
        assert_eq!(d.sort_key(), "inch/fader/level");
        assert!(d.is_input_channel_axis());
        assert!(d.has_x_axis());
        assert!(!d.has_y_axis());
    }

    #[test]
    fn tf_scene_label_is_forced() {
        let scene = CommandDescriptor {
            address: "scene_".to_string(),
            param_type: ParamType::Scene,
            ..fader()
        };
        assert_eq!(scene.label(ConsoleModel::Tf), "Scene/Bank");
        assert_eq!(scene.label(ConsoleModel::ClQl), "scene_");
    }

    #[test]
    fn roles_follow_address_suffix() {
        let mut d = fader();
        assert_eq!(d.role(), CommandRole::Ordinary);
        d.address = "MIXER:Current/InCh/Label/Name".to_string();
        assert_eq!(d.role(), CommandRole::Name);
        d.address = "MIXER:Current/InCh/Label/Color".to_string();
        assert_eq!(d.role(), CommandRole::Color);
    }
}
