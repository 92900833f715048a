// Copyright (c) 2024 Mike Tsao

//! Turns a [Dictionary] into the action and feedback catalog that a host
//! presents to its users.
//!
//! Every dictionary entry yields one action (`scp_<index>`) and one feedback
//! with the same id. The options on each are derived from the entry's axes
//! and [ParamType]; a handful of text parameters get curated dropdowns instead
//! of a free text box. Building a catalog is deterministic: the same
//! dictionary and settings always produce the same catalog, in the same order.

use crate::{
    dictionary::Dictionary,
    prelude::*,
    util::ChannelAliases,
};
use serde::{Deserialize, Serialize};

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ActionDescriptor, Catalog, FeedbackDescriptor, FeedbackKind, OptionField, OptionKey,
    };
}

pub use choices::{
    bank_choices, channel_choices, color_choices, curated_value_choices, fader_bank_choices,
    icon_choices, output_patch_choices,
};
pub use options::{Choice, OptionField, OptionKey, OptionKind};

mod choices;
mod options;

/// A host-visible action: an id and the form that configures it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    #[allow(missing_docs)]
    pub id: ActionId,
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub options: Vec<OptionField>,
}
impl ActionDescriptor {
    /// The option with the given key, if the action has one.
    pub fn option(&self, key: OptionKey) -> Option<&OptionField> {
        self.options.iter().find(|o| o.id == key)
    }
}

/// How the host should treat a feedback's result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackKind {
    /// On or off, drawn with the subscription's colours when on.
    Boolean,
    /// Shows the parameter's text on the button.
    Name,
    /// Paints the button with the parameter's channel colour.
    Color,
}

/// A host-visible feedback: an id, its kind, and the form that configures
/// it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeedbackDescriptor {
    #[allow(missing_docs)]
    pub id: FeedbackId,
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub kind: FeedbackKind,
    /// The style a matched boolean feedback shows unless the subscription
    /// says otherwise.
    pub default_style: ButtonStyle,
    #[allow(missing_docs)]
    pub options: Vec<OptionField>,
}
impl FeedbackDescriptor {
    /// The option with the given key, if the feedback has one.
    pub fn option(&self, key: OptionKey) -> Option<&OptionField> {
        self.options.iter().find(|o| o.id == key)
    }
}

/// Everything a host needs to offer a console's controls, plus the
/// dictionary and settings they were built from.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    model: ConsoleModel,
    aliases: ChannelAliases,
    dictionary: Dictionary,
    actions: Vec<ActionDescriptor>,
    feedbacks: Vec<FeedbackDescriptor>,
}
impl Catalog {
    /// Synthesizes the catalog. Dictionary order is preserved, and the macro
    /// controls come last.
    pub fn build(dictionary: Dictionary, settings: &ScpSettings) -> Self {
        let model = settings.model();
        let aliases = settings.channel_aliases().clone();

        let mut actions = Vec::with_capacity(dictionary.len() + 2);
        let mut feedbacks = Vec::with_capacity(dictionary.len() + 1);
        for descriptor in dictionary.descriptors() {
            let synth = Synthesizer {
                descriptor,
                model,
                aliases: &aliases,
            };
            actions.push(synth.action());
            feedbacks.push(synth.feedback());
        }
        actions.push(ActionDescriptor {
            id: ActionId::MacroRecordStart,
            name: "Macro: start recording".to_string(),
            options: Vec::default(),
        });
        actions.push(ActionDescriptor {
            id: ActionId::MacroRecordStop,
            name: "Macro: stop recording".to_string(),
            options: Vec::default(),
        });
        feedbacks.push(FeedbackDescriptor {
            id: FeedbackId::MacroRecording,
            name: "Macro: recording".to_string(),
            kind: FeedbackKind::Boolean,
            default_style: ButtonStyle::ACTIVE,
            options: style_options(),
        });
        log::debug!(
            "built {model} catalog: {} actions, {} feedbacks",
            actions.len(),
            feedbacks.len()
        );

        Self {
            model,
            aliases,
            dictionary,
            actions,
            feedbacks,
        }
    }

    #[allow(missing_docs)]
    pub fn model(&self) -> ConsoleModel {
        self.model
    }

    /// The channel alias table as it stood when the catalog was built.
    pub fn aliases(&self) -> &ChannelAliases {
        &self.aliases
    }

    #[allow(missing_docs)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    #[allow(missing_docs)]
    pub fn descriptor(&self, index: CommandIndex) -> Option<&CommandDescriptor> {
        self.dictionary.get(index)
    }

    #[allow(missing_docs)]
    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    #[allow(missing_docs)]
    pub fn feedbacks(&self) -> &[FeedbackDescriptor] {
        &self.feedbacks
    }

    #[allow(missing_docs)]
    pub fn action(&self, id: ActionId) -> Option<&ActionDescriptor> {
        self.actions.iter().find(|a| a.id == id)
    }

    #[allow(missing_docs)]
    pub fn feedback(&self, id: FeedbackId) -> Option<&FeedbackDescriptor> {
        self.feedbacks.iter().find(|f| f.id == id)
    }

    /// The catalog in the shape the host registers: `{ "actions": [...],
    /// "feedbacks": [...] }`.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        #[derive(Serialize)]
        struct Registry<'a> {
            actions: &'a [ActionDescriptor],
            feedbacks: &'a [FeedbackDescriptor],
        }
        serde_json::to_value(Registry {
            actions: &self.actions,
            feedbacks: &self.feedbacks,
        })
    }
}

/// Derives the options for one dictionary entry. Actions and feedbacks share
/// the axis options; each builds its own tail.
struct Synthesizer<'a> {
    descriptor: &'a CommandDescriptor,
    model: ConsoleModel,
    aliases: &'a ChannelAliases,
}
impl<'a> Synthesizer<'a> {
    fn action(&self) -> ActionDescriptor {
        let mut options = self.axis_options();
        options.extend(self.value_option());
        ActionDescriptor {
            id: ActionId::Scp(self.descriptor.index),
            name: self.descriptor.label(self.model),
            options,
        }
    }

    fn feedback(&self) -> FeedbackDescriptor {
        let mut options = self.axis_options();
        let kind = match self.descriptor.role() {
            CommandRole::Ordinary => {
                options.extend(self.value_option());
                options.extend(style_options());
                FeedbackKind::Boolean
            }
            CommandRole::Name => FeedbackKind::Name,
            CommandRole::Color => FeedbackKind::Color,
        };
        FeedbackDescriptor {
            id: FeedbackId::Scp(self.descriptor.index),
            name: self.descriptor.label(self.model),
            kind,
            default_style: ButtonStyle::ACTIVE,
            options,
        }
    }

    fn axis_options(&self) -> Vec<OptionField> {
        let d = self.descriptor;
        let mut options = Vec::with_capacity(2);
        if d.has_x_axis() {
            options.push(if d.is_input_channel_axis() {
                OptionField::dropdown(
                    OptionKey::X,
                    "Channel",
                    channel_choices(d.dim_x, self.aliases),
                    OptionValue::Number(1),
                )
            } else if d.param_type == ParamType::Scene {
                OptionField::number(OptionKey::X, "Scene", 0, i64::from(d.dim_x) - 1, 1)
            } else {
                OptionField::number(OptionKey::X, "X", 1, i64::from(d.dim_x), 1)
            });
        }
        if d.has_y_axis() {
            options.push(match (self.model, d.param_type) {
                (ConsoleModel::Tf, ParamType::Scene) => {
                    OptionField::dropdown(OptionKey::Y, "Bank", bank_choices(), "a".into())
                }
                _ => OptionField::number(OptionKey::Y, "Y", 1, i64::from(d.dim_y), 1),
            });
        }
        options
    }

    fn value_option(&self) -> Option<OptionField> {
        let d = self.descriptor;
        match d.param_type {
            ParamType::Integer if d.is_toggle() => Some(OptionField::checkbox(
                OptionKey::Val,
                "Value",
                d.default.as_int() == Some(1),
            )),
            ParamType::Integer => Some(OptionField::number(
                OptionKey::Val,
                "Value",
                d.min,
                d.max,
                d.default.as_int().unwrap_or(d.min),
            )),
            ParamType::String | ParamType::Binary => {
                let default = d.default.to_string();
                Some(match curated_value_choices(d, self.model) {
                    Some(choices) => OptionField::dropdown(
                        OptionKey::Val,
                        "Value",
                        choices,
                        default.as_str().into(),
                    ),
                    None => OptionField::text(OptionKey::Val, "Value", &default),
                })
            }
            ParamType::Scene => None,
        }
    }
}

fn style_options() -> Vec<OptionField> {
    vec![
        OptionField::color(OptionKey::Fg, "Foreground colour", ButtonStyle::ACTIVE.color),
        OptionField::color(OptionKey::Bg, "Background colour", ButtonStyle::ACTIVE.bgcolor),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str =
        r#"OK PRM 12 "MIXER:Current/InCh/Fader/Level" 72 1 0 1000 0 "dB" integer 1 1"#;

    fn catalog_for(text: &str, model: ConsoleModel) -> Catalog {
        Catalog::build(
            Dictionary::parse(text),
            &ScpSettings::new_with("127.0.0.1", model),
        )
    }

    #[test]
    fn fader_level_scenario() {
        let catalog = catalog_for(SCENARIO, ConsoleModel::ClQl);
        let action = catalog.action(ActionId::Scp(CommandIndex(12))).unwrap();
        assert_eq!(action.id.to_string(), "scp_12");
        assert_eq!(action.name, "InCh/Fader/Level");

        let x = action.option(OptionKey::X).unwrap();
        let channels = x.choices().expect("input channels use a dropdown");
        assert_eq!(channels.first().map(|c| &c.id), Some(&OptionValue::Number(1)));
        assert_eq!(
            channels.iter().filter(|c| c.id.as_number() > Some(0)).count(),
            72
        );
        assert!(action.option(OptionKey::Y).is_none());
        assert!(matches!(
            action.option(OptionKey::Val).map(|o| &o.kind),
            Some(OptionKind::Number { min: 0, max: 1000, .. })
        ));
    }

    #[test]
    fn non_channel_x_axis_is_a_range() {
        let catalog = catalog_for(
            r#"OK PRM 30 "MIXER:Current/Mix/Fader/Level" 24 1 0 1000 0 "dB" integer 1 1"#,
            ConsoleModel::ClQl,
        );
        let action = catalog.action(ActionId::Scp(CommandIndex(30))).unwrap();
        assert!(matches!(
            action.option(OptionKey::X).map(|o| &o.kind),
            Some(OptionKind::Number { min: 1, max: 24, default: 1 })
        ));
    }

    #[test]
    fn toggles_become_checkboxes() {
        let catalog = catalog_for(
            r#"OK PRM 1 "MIXER:Current/InCh/Fader/On" 72 1 0 1 1 "" integer any rw 1"#,
            ConsoleModel::ClQl,
        );
        let action = catalog.action(ActionId::Scp(CommandIndex(1))).unwrap();
        assert_eq!(
            action.option(OptionKey::Val).map(|o| o.default_value()),
            Some(OptionValue::Bool(true))
        );
    }

    #[test]
    fn feedback_shapes_follow_role() {
        let catalog = catalog_for(
            r#"OK PRM 1 "MIXER:Current/InCh/Fader/On" 72 1 0 1 1 "" integer any rw 1
OK PRM 7 "MIXER:Current/InCh/Label/Name" 72 1 0 8 "" "" string any rw 1
OK PRM 8 "MIXER:Current/InCh/Label/Color" 72 1 0 0 "Blue" "" string any rw 1"#,
            ConsoleModel::ClQl,
        );
        let keys = |id: u32| -> Vec<OptionKey> {
            catalog
                .feedback(FeedbackId::Scp(CommandIndex(id)))
                .unwrap()
                .options
                .iter()
                .map(|o| o.id)
                .collect()
        };
        assert_eq!(
            keys(1),
            vec![OptionKey::X, OptionKey::Val, OptionKey::Fg, OptionKey::Bg]
        );
        assert_eq!(keys(7), vec![OptionKey::X]);
        assert_eq!(keys(8), vec![OptionKey::X]);
        assert_eq!(
            catalog.feedback(FeedbackId::Scp(CommandIndex(8))).unwrap().kind,
            FeedbackKind::Color
        );

        // The action keeps its value option; the colour dropdown is curated.
        let color = catalog.action(ActionId::Scp(CommandIndex(8))).unwrap();
        assert_eq!(
            color.option(OptionKey::Val).map(|o| o.default_value()),
            Some(OptionValue::Text("Blue".into()))
        );
    }

    #[test]
    fn tf_scenes_use_bank_dropdown_and_no_value() {
        let catalog = catalog_for(
            r#"OK scninfo 1000 "scene_" 100 2 0 99 0 "" scene any rw 1"#,
            ConsoleModel::Tf,
        );
        let action = catalog.action(ActionId::Scp(CommandIndex(1000))).unwrap();
        assert_eq!(action.name, "Scene/Bank");
        assert!(action.option(OptionKey::Val).is_none());
        let banks = action.option(OptionKey::Y).and_then(|o| o.choices()).unwrap();
        assert_eq!(banks.len(), 2);
        assert!(matches!(
            action.option(OptionKey::X).map(|o| &o.kind),
            Some(OptionKind::Number { min: 0, max: 99, .. })
        ));
    }

    #[test]
    fn macro_controls_are_appended() {
        let catalog = catalog_for(SCENARIO, ConsoleModel::ClQl);
        let ids: Vec<String> = catalog.actions().iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["scp_12", "macro_record_start", "macro_record_stop"]);
        let recording = catalog.feedback(FeedbackId::MacroRecording).unwrap();
        assert_eq!(recording.kind, FeedbackKind::Boolean);
    }

    #[test]
    fn builds_are_deterministic() {
        let settings = ScpSettings::new_with("127.0.0.1", ConsoleModel::ClQl);
        let a = Catalog::build(Dictionary::builtin(ConsoleModel::ClQl).unwrap(), &settings);
        let b = Catalog::build(Dictionary::builtin(ConsoleModel::ClQl).unwrap(), &settings);
        assert_eq!(a.actions(), b.actions());
        assert_eq!(a.feedbacks(), b.feedbacks());
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

    #[test]
    fn json_registry_uses_string_ids() {
        let catalog = catalog_for(SCENARIO, ConsoleModel::ClQl);
        let json = catalog.to_json().unwrap();
        assert_eq!(json["actions"][0]["id"], "scp_12");
        assert_eq!(json["feedbacks"][0]["kind"], "boolean");
        assert_eq!(json["actions"][0]["options"][1]["type"], "number");
    }
}
