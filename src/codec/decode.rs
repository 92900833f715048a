// Copyright (c) 2024 Mike Tsao

use crate::{
    catalog::Catalog,
    dictionary::{is_record_status, tokenize},
    prelude::*,
};
use log::{debug, trace, warn};

/// Words that can follow the status token. A `NOTIFY` line may leave the word
/// out and go straight to the address.
const COMMAND_WORDS: &[&str] = &[
    "set",
    "get",
    "ssrecall_ex",
    "sscurrent_ex",
    "prminfo",
    "scninfo",
    "mtrinfo",
    "devinfo",
    "devstatus",
    "scpmode",
];

fn is_command_word(token: &str) -> bool {
    COMMAND_WORDS.iter().any(|w| w.eq_ignore_ascii_case(token))
}

/// A parameter value reported by the console, matched to its dictionary
/// entry. Coordinates are as they appeared on the wire (0-based).
#[derive(Clone, Debug, PartialEq)]
pub struct ValueRecord {
    /// The dictionary entry the address matched.
    pub index: CommandIndex,
    /// The address exactly as received.
    pub address: String,
    #[allow(missing_docs)]
    pub x: Option<u32>,
    #[allow(missing_docs)]
    pub y: Option<u32>,
    #[allow(missing_docs)]
    pub val: ScpValue,
    /// Display text some replies carry after the value.
    pub txt_val: Option<String>,
}
impl ValueRecord {
    /// The 1-based coordinates this record is cached under. Missing
    /// coordinates count as 0 on the wire.
    pub fn coordinates(&self) -> (u32, u32) {
        (
            self.x.unwrap_or_default().saturating_add(1),
            self.y.unwrap_or_default().saturating_add(1),
        )
    }
}

/// What an inbound line turned out to be.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedLine {
    /// A value for a known parameter.
    Value(ValueRecord),
    /// The reply to `devinfo productname`.
    DeviceName(String),
    /// The console rejected something we sent.
    Error(String),
    /// A well-formed reply about an address the dictionary doesn't know.
    Unmatched(String),
    /// Anything else: blank lines, acknowledgements without a value, lines
    /// that don't tokenize.
    Ignored,
}

/// Decodes one inbound line against a catalog's dictionary.
pub fn decode(catalog: &Catalog, line: &str) -> DecodedLine {
    let tokens = match tokenize(line) {
        Ok(tokens) => tokens,
        Err(e) => {
            debug!("{e}");
            return DecodedLine::Ignored;
        }
    };
    let Some((status, rest)) = tokens.split_first() else {
        return DecodedLine::Ignored;
    };
    if status.eq_ignore_ascii_case("ERROR") {
        warn!("console reported an error: {line}");
        return DecodedLine::Error(line.to_string());
    }
    if !is_record_status(status) {
        trace!("ignoring {line}");
        return DecodedLine::Ignored;
    }

    if let [command, key, name @ ..] = rest {
        if command.eq_ignore_ascii_case("devinfo") && key.eq_ignore_ascii_case("productname") {
            return if name.is_empty() {
                DecodedLine::Ignored
            } else {
                DecodedLine::DeviceName(name.join(" "))
            };
        }
    }

    let fields = match rest.first() {
        Some(command) if is_command_word(command) => &rest[1..],
        _ => rest,
    };
    let Some((address, values)) = fields.split_first() else {
        return DecodedLine::Ignored;
    };
    let Some(descriptor) = catalog.dictionary().find_by_address(address) else {
        debug!("no parameter at {address}");
        return DecodedLine::Unmatched(address.clone());
    };

    let record = match descriptor.param_type {
        ParamType::Scene => decode_scene(descriptor, catalog.model(), address, values),
        ParamType::Integer | ParamType::Binary | ParamType::String => {
            decode_parameter(descriptor, address, values)
        }
    };
    match record {
        Some(record) => DecodedLine::Value(record),
        None => {
            trace!("no value in {line}");
            DecodedLine::Ignored
        }
    }
}

fn decode_parameter(
    descriptor: &CommandDescriptor,
    address: &str,
    values: &[String],
) -> Option<ValueRecord> {
    // A missing coordinate means 0; one that's there but isn't a number
    // spoils the line.
    let coordinate = |i: usize| match values.get(i) {
        None => Ok(None),
        Some(t) => t.parse::<u32>().map(Some).map_err(|_| t.clone()),
    };
    let (x, y) = match (coordinate(0), coordinate(1)) {
        (Ok(x), Ok(y)) => (x, y),
        (Err(token), _) | (_, Err(token)) => {
            debug!("{address}: bad coordinate {token:?}");
            return None;
        }
    };
    let token = values.get(2)?;
    let val = match descriptor.param_type {
        ParamType::String => ScpValue::Text(token.clone()),
        _ => ScpValue::from_token(token),
    };
    Some(ValueRecord {
        index: descriptor.index,
        address: address.to_string(),
        x,
        y,
        val,
        txt_val: values.get(3).cloned(),
    })
}

/// Scene replies carry the scene number where other replies carry X. On TF
/// consoles the address ends in the bank letter, which becomes Y.
fn decode_scene(
    descriptor: &CommandDescriptor,
    model: ConsoleModel,
    address: &str,
    values: &[String],
) -> Option<ValueRecord> {
    let val = ScpValue::from_token(values.first()?);
    let y = match model {
        ConsoleModel::ClQl => None,
        ConsoleModel::Tf => {
            let suffix = address.get(descriptor.address.len()..).unwrap_or_default();
            let bank = super::bank_number(Some(&OptionValue::Text(suffix.to_string())));
            Some(bank - 1)
        }
    };
    Some(ValueRecord {
        index: descriptor.index,
        address: address.to_string(),
        x: None,
        y,
        val,
        txt_val: values.get(1).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;

    const DICTIONARY: &str = r#"
OK PRM 12 "MIXER:Current/InCh/Fader/Level" 72 1 0 1000 0 "dB" integer 1 1
OK PRM 7 "MIXER:Current/InCh/Label/Name" 72 1 0 8 "" "" string any rw 1
OK scninfo 1000 "MIXER:Lib/Scene" 300 1 0 300 0 "" scene any rw 1
OK scninfo 1001 "scene_" 100 2 0 99 0 "" scene any rw 1
"#;

    fn catalog(model: ConsoleModel) -> Catalog {
        Catalog::build(
            Dictionary::parse(DICTIONARY),
            &ScpSettings::new_with("127.0.0.1", model),
        )
    }

    #[test]
    fn notify_without_command_word() {
        let DecodedLine::Value(record) = decode(
            &catalog(ConsoleModel::ClQl),
            "NOTIFY MIXER:Current/InCh/Fader/Level 4 0 250",
        ) else {
            panic!("expected a value");
        };
        assert_eq!(record.index, CommandIndex(12));
        assert_eq!((record.x, record.y), (Some(4), Some(0)));
        assert_eq!(record.coordinates(), (5, 1));
        assert_eq!(record.val, ScpValue::Int(250));
    }

    #[test]
    fn ok_reply_with_text_value() {
        let DecodedLine::Value(record) = decode(
            &catalog(ConsoleModel::ClQl),
            r#"OK get MIXER:Current/InCh/Label/Name 2 0 "Lead Vox""#,
        ) else {
            panic!("expected a value");
        };
        assert_eq!(record.val, ScpValue::Text("Lead Vox".into()));
        assert_eq!(record.coordinates(), (3, 1));

        let DecodedLine::Value(record) = decode(
            &catalog(ConsoleModel::ClQl),
            r#"OK get MIXER:Current/InCh/Fader/Level 0 0 -32768 "-inf""#,
        ) else {
            panic!("expected a value");
        };
        assert_eq!(record.txt_val.as_deref(), Some("-inf"));
    }

    #[test]
    fn device_identity_is_separate() {
        assert_eq!(
            decode(&catalog(ConsoleModel::ClQl), r#"OK devinfo productname "CL5""#),
            DecodedLine::DeviceName("CL5".into())
        );
    }

    #[test]
    fn scene_numbers_move_into_value() {
        let DecodedLine::Value(record) = decode(
            &catalog(ConsoleModel::ClQl),
            "NOTIFY sscurrent_ex MIXER:Lib/Scene 12",
        ) else {
            panic!("expected a value");
        };
        assert_eq!(record.index, CommandIndex(1000));
        assert_eq!(record.val, ScpValue::Int(12));
        assert_eq!(record.coordinates(), (1, 1));

        let DecodedLine::Value(record) =
            decode(&catalog(ConsoleModel::Tf), "OK sscurrent_ex scene_b 7")
        else {
            panic!("expected a value");
        };
        assert_eq!(record.index, CommandIndex(1001));
        assert_eq!(record.val, ScpValue::Int(7));
        assert_eq!(record.coordinates(), (1, 2));
    }

    #[test]
    fn unmatched_and_junk_lines_are_harmless() {
        let catalog = catalog(ConsoleModel::ClQl);
        assert_eq!(
            decode(&catalog, "NOTIFY set MIXER:Current/Nope 0 0 1"),
            DecodedLine::Unmatched("MIXER:Current/Nope".into())
        );
        assert!(matches!(
            decode(&catalog, "ERROR set MIXER:Current/InCh/Fader/Level 0 0 9999 InvalidArgument"),
            DecodedLine::Error(_)
        ));
        for junk in ["", "hello there", r#"OK set "unterminated"#, "OK set MIXER:Current/InCh/Fader/Level 0 0", "OK",
            "NOTIFY set MIXER:Current/InCh/Fader/Level abc 0 250",
            "NOTIFY set MIXER:Current/InCh/Fader/Level 0 -1 250"] {
            assert_eq!(decode(&catalog, junk), DecodedLine::Ignored, "{junk:?}");
        }
    }
}
