// Copyright (c) 2024 Mike Tsao

//! Curated dropdown tables for the parameters whose text values come from a
//! fixed console vocabulary rather than free typing.

use super::Choice;
use crate::{prelude::*, types::Palette, util::ChannelAliases};

/// How many of each bus a console family has. Drives the source and patch
/// tables.
struct ModelLayout {
    inputs: u32,
    stereo_inputs: u32,
    mixes: u32,
    matrices: u32,
    dcas: u32,
}
impl ModelLayout {
    const CL_QL: ModelLayout = ModelLayout {
        inputs: 72,
        stereo_inputs: 8,
        mixes: 24,
        matrices: 8,
        dcas: 16,
    };
    const TF: ModelLayout = ModelLayout {
        inputs: 40,
        stereo_inputs: 2,
        mixes: 20,
        matrices: 0,
        dcas: 8,
    };

    fn for_model(model: ConsoleModel) -> &'static ModelLayout {
        match model {
            ConsoleModel::ClQl => &Self::CL_QL,
            ConsoleModel::Tf => &Self::TF,
        }
    }
}

const ICONS: &[&str] = &[
    "Blank",
    "Kick",
    "Snare",
    "HiHat",
    "Tom",
    "Drums",
    "Perc",
    "Bass",
    "E.Guitar",
    "A.Guitar",
    "Keyboard",
    "Piano",
    "Organ",
    "Strings",
    "Brass",
    "Wind",
    "Vocal",
    "Male",
    "Female",
    "Choir",
    "Audience",
    "Speaker",
    "Monitor",
    "Effect",
    "PC",
    "Media",
    "Wireless",
];

const NONE: &str = "NONE";

/// `CH1` through `CH<count>`, then one entry per channel alias slot.
pub fn channel_choices(count: u32, aliases: &ChannelAliases) -> Vec<Choice> {
    (1..=count)
        .map(|n| Choice::new(i64::from(n), format!("CH{n}")))
        .chain(
            aliases
                .labels()
                .map(|(sentinel, label)| Choice::new(sentinel, label)),
        )
        .collect()
}

/// TF scene banks.
pub fn bank_choices() -> Vec<Choice> {
    vec![Choice::new("a", "A"), Choice::new("b", "B")]
}

/// The model's channel colours, by name.
pub fn color_choices(model: ConsoleModel) -> Vec<Choice> {
    Palette::for_model(model)
        .colors()
        .iter()
        .map(|c| Choice::new(c.to_string().as_str(), c.to_string()))
        .collect()
}

#[allow(missing_docs)]
pub fn icon_choices() -> Vec<Choice> {
    ICONS.iter().map(|&i| Choice::new(i, i)).collect()
}

/// Every strip a custom fader bank slot can show.
pub fn fader_bank_choices(model: ConsoleModel) -> Vec<Choice> {
    let layout = ModelLayout::for_model(model);
    let mut choices = vec![Choice::new(NONE, "None")];
    let mut push_range = |prefix: &str, label: &str, count: u32| {
        choices.extend(
            (1..=count).map(|n| Choice::new(format!("{prefix}{n}").as_str(), format!("{label}{n}"))),
        );
    };
    push_range("InCh", "CH", layout.inputs);
    push_range("StInCh", "ST IN", layout.stereo_inputs);
    push_range("Mix", "MIX", layout.mixes);
    push_range("Mtrx", "MATRIX", layout.matrices);
    push_range("DCA", "DCA", layout.dcas);
    choices.push(Choice::new("St", "STEREO"));
    if model == ConsoleModel::ClQl {
        choices.push(Choice::new("Mono", "MONO"));
    }
    choices
}

/// Signals that can feed a network or Omni output.
pub fn output_patch_choices(model: ConsoleModel) -> Vec<Choice> {
    let layout = ModelLayout::for_model(model);
    let mut ids = vec![NONE.to_string()];
    let mix = match model {
        ConsoleModel::ClQl => "MIX",
        ConsoleModel::Tf => "AUX",
    };
    ids.extend((1..=layout.mixes).map(|n| format!("{mix}{n}")));
    ids.extend((1..=layout.matrices).map(|n| format!("MTRX{n}")));
    ids.extend(["ST L", "ST R"].map(String::from));
    match model {
        ConsoleModel::ClQl => ids.push("MONO".to_string()),
        ConsoleModel::Tf => ids.push("SUB".to_string()),
    }
    ids.extend(["CUE L", "CUE R"].map(String::from));
    ids.extend((1..=layout.inputs).map(|n| format!("DIR{n}")));
    ids.into_iter()
        .map(|id| Choice::new(id.as_str(), id.as_str()))
        .collect()
}

/// Routes a text parameter to its curated table, if its address calls for
/// one.
pub fn curated_value_choices(
    descriptor: &CommandDescriptor,
    model: ConsoleModel,
) -> Option<Vec<Choice>> {
    let short = descriptor.short_address();
    if short.ends_with("Color") {
        Some(color_choices(model))
    } else if short.ends_with("Icon") {
        Some(icon_choices())
    } else if short.starts_with("CustomFaderBank") {
        Some(fader_bank_choices(model))
    } else if short.ends_with("DanteOutPort/Patch") || short.ends_with("OmniOutPort/Patch") {
        Some(output_patch_choices(model))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_param(address: &str) -> CommandDescriptor {
        CommandDescriptor {
            address: address.to_string(),
            param_type: ParamType::String,
            default: ScpValue::Text(NONE.to_string()),
            ..crate::dictionary::tests_support::fader()
        }
    }

    #[test]
    fn channel_dropdown_appends_alias_slots() {
        let mut aliases = ChannelAliases::default();
        aliases.0[0].name = "Lead Vox".to_string();
        let choices = channel_choices(3, &aliases);
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["CH1", "CH2", "CH3", "Lead Vox", "Alias 2", "Alias 3", "Alias 4"]
        );
        assert_eq!(choices[3].id, OptionValue::Number(-1));
    }

    #[test]
    fn palettes_differ_by_model() {
        let cl = color_choices(ConsoleModel::ClQl);
        let tf = color_choices(ConsoleModel::Tf);
        assert!(cl.iter().any(|c| c.label == "SkyBlue"));
        assert!(!tf.iter().any(|c| c.label == "SkyBlue"));
        assert!(tf.iter().any(|c| c.label == "Magenta"));
    }

    #[test]
    fn address_patterns_route_to_tables() {
        let model = ConsoleModel::ClQl;
        for (address, expected_first) in [
            ("MIXER:Current/InCh/Label/Color", "Purple"),
            ("MIXER:Current/InCh/Label/Icon", "Blank"),
            ("MIXER:Current/CustomFaderBank/Master/Fader", NONE),
            ("IO:Current/DanteOutPort/Patch", NONE),
            ("IO:Current/OmniOutPort/Patch", NONE),
        ] {
            let choices = curated_value_choices(&text_param(address), model)
                .unwrap_or_else(|| panic!("{address} should have a table"));
            assert_eq!(choices[0].id, OptionValue::Text(expected_first.into()), "{address}");
        }
        assert!(curated_value_choices(&text_param("MIXER:Current/InCh/Label/Name"), model).is_none());
    }

    #[test]
    fn tables_follow_model_layout() {
        let tf = fader_bank_choices(ConsoleModel::Tf);
        assert!(tf.iter().any(|c| c.id == OptionValue::Text("InCh40".into())));
        assert!(!tf.iter().any(|c| c.id == OptionValue::Text("InCh41".into())));
        assert!(!tf.iter().any(|c| c.label.starts_with("MATRIX")));

        let cl = output_patch_choices(ConsoleModel::ClQl);
        assert!(cl.iter().any(|c| c.label == "MTRX8"));
        let tf = output_patch_choices(ConsoleModel::Tf);
        assert!(tf.iter().any(|c| c.label == "AUX20"));
    }
}
