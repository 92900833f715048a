// Copyright (c) 2024 Mike Tsao

use super::{tokenize, CommandDescriptor};
use crate::{error::ScpError, prelude::*};
use std::str::FromStr;

// Positions in the dictionary schema:
// Ok, Command, Index, Address, X, Y, Min, Max, Default, Unit, Type, UI, RW, Scale
const COMMAND: usize = 1;
const INDEX: usize = 2;
const ADDRESS: usize = 3;
const DIM_X: usize = 4;
const DIM_Y: usize = 5;
const MIN: usize = 6;
const MAX: usize = 7;
const DEFAULT: usize = 8;
const UNIT: usize = 9;
const TYPE: usize = 10;
const UI: usize = 11;
const RW: usize = 12;
const SCALE: usize = 13;

/// Records must reach the `Type` column; `UI`, `RW` and `Scale` are optional.
const MIN_FIELDS: usize = TYPE + 1;
const MAX_FIELDS: usize = SCALE + 1;

/// What a single dictionary line turned out to be.
#[derive(Debug, PartialEq)]
pub enum DictionaryRecord {
    /// Not an `OK`/`NOTIFY` line. Comments, headers, blank lines.
    Ignored,
    /// A read-only confirmation echo (`GET`, `SSCURRENT_EX`). Recognized, but
    /// not a controllable parameter.
    Echo(CommandDescriptor),
    /// A controllable parameter.
    Descriptor(CommandDescriptor),
}

/// Tallies what a load saw, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseReport {
    #[allow(missing_docs)]
    pub accepted: usize,
    #[allow(missing_docs)]
    pub echoes: usize,
    #[allow(missing_docs)]
    pub ignored: usize,
    /// Lines that looked like records but didn't fit the schema, plus
    /// duplicates of an earlier index or address.
    pub malformed: usize,
}

/// Whether a line's first token marks it as a record.
pub(crate) fn is_record_status(token: &str) -> bool {
    token.eq_ignore_ascii_case("OK") || token.eq_ignore_ascii_case("NOTIFY")
}

/// Parses one dictionary line.
pub fn parse_record(line: &str) -> Result<DictionaryRecord, ScpError> {
    let tokens = tokenize(line)?;
    match tokens.first() {
        Some(status) if is_record_status(status) => {}
        _ => return Ok(DictionaryRecord::Ignored),
    }
    if !(MIN_FIELDS..=MAX_FIELDS).contains(&tokens.len()) {
        return Err(ScpError::malformed(line, "wrong number of fields"));
    }

    let field = |i: usize| tokens.get(i).map(String::as_str).unwrap_or_default();
    let param_type = ParamType::from_str(field(TYPE))
        .map_err(|_| ScpError::malformed(line, "unknown type"))?;
    let number = |i: usize, what: &'static str| {
        field(i)
            .parse::<i64>()
            .map_err(|_| ScpError::malformed(line, what))
    };
    let dimension = |i: usize| match field(i).parse::<u32>() {
        Ok(d) if d > 0 => Ok(d),
        _ => Err(ScpError::malformed(line, "bad dimension")),
    };
    // Text parameters sometimes leave their bounds blank.
    let bound = |i: usize, what: &'static str| match param_type {
        ParamType::Integer => number(i, what),
        _ => Ok(field(i).parse::<i64>().unwrap_or_default()),
    };
    let default = match param_type {
        ParamType::String => ScpValue::Text(field(DEFAULT).to_string()),
        _ => ScpValue::from_token(field(DEFAULT)),
    };

    let descriptor = CommandDescriptor {
        index: CommandIndex(
            field(INDEX)
                .parse::<u32>()
                .map_err(|_| ScpError::malformed(line, "bad index"))?,
        ),
        address: field(ADDRESS).to_string(),
        dim_x: dimension(DIM_X)?,
        dim_y: dimension(DIM_Y)?,
        min: bound(MIN, "bad min")?,
        max: bound(MAX, "bad max")?,
        default,
        unit: field(UNIT).to_string(),
        param_type,
        ui: field(UI).to_string(),
        rw: field(RW).to_string(),
        scale: match tokens.get(SCALE) {
            Some(s) => s
                .parse::<i64>()
                .map_err(|_| ScpError::malformed(line, "bad scale"))?,
            None => 1,
        },
    };
    if descriptor.address.is_empty() {
        return Err(ScpError::malformed(line, "empty address"));
    }

    let command = field(COMMAND);
    if command.eq_ignore_ascii_case("GET") || command.eq_ignore_ascii_case("SSCURRENT_EX") {
        Ok(DictionaryRecord::Echo(descriptor))
    } else {
        Ok(DictionaryRecord::Descriptor(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADER: &str =
        r#"OK PRM 12 "MIXER:Current/InCh/Fader/Level" 72 1 0 1000 0 "dB" integer 1 1"#;

    #[test]
    fn parses_short_record() {
        let DictionaryRecord::Descriptor(d) = parse_record(FADER).unwrap() else {
            panic!("expected a descriptor");
        };
        assert_eq!(d.index, CommandIndex(12));
        assert_eq!(d.address, "MIXER:Current/InCh/Fader/Level");
        assert_eq!((d.dim_x, d.dim_y), (72, 1));
        assert_eq!((d.min, d.max), (0, 1000));
        assert_eq!(d.default, ScpValue::Int(0));
        assert_eq!(d.unit, "dB");
        assert_eq!(d.param_type, ParamType::Integer);
        assert_eq!((d.ui.as_str(), d.rw.as_str()), ("1", "1"));
        assert_eq!(d.scale, 1, "missing scale defaults to 1");
    }

    #[test]
    fn parses_full_string_record() {
        let line = r#"notify prminfo 3 "MIXER:Current/InCh/Label/Name" 72 1 0 8 "" "" string any rw 1"#;
        let DictionaryRecord::Descriptor(d) = parse_record(line).unwrap() else {
            panic!("expected a descriptor");
        };
        assert_eq!(d.param_type, ParamType::String);
        assert_eq!(d.default, ScpValue::Text(String::new()));
        assert_eq!(d.rw, "rw");
    }

    #[test]
    fn echoes_are_classified() {
        let line = r#"OK get 5 "MIXER:Current/InCh/Fader/On" 72 1 0 1 1 "" integer any r 1"#;
        assert!(matches!(
            parse_record(line).unwrap(),
            DictionaryRecord::Echo(_)
        ));
        let line = r#"OK SSCURRENT_EX 900 "MIXER:Lib/Scene" 1 1 0 300 0 "" scene any r 1"#;
        assert!(matches!(
            parse_record(line).unwrap(),
            DictionaryRecord::Echo(_)
        ));
    }

    #[test]
    fn unknown_leading_token_is_ignored_without_error() {
        assert_eq!(
            parse_record("# CL5 parameter list").unwrap(),
            DictionaryRecord::Ignored
        );
        assert_eq!(
            parse_record(r#"ERROR PRM 1 "X" 1 1 0 1 0 "" integer"#).unwrap(),
            DictionaryRecord::Ignored
        );
        assert_eq!(parse_record("").unwrap(), DictionaryRecord::Ignored);
    }

    #[test]
    fn malformed_records_are_errors() {
        for line in [
            r#"OK PRM 12 "MIXER:Current/InCh/Fader/Level" 72 1"#,
            r#"OK PRM x "A" 1 1 0 1 0 "" integer"#,
            r#"OK PRM 1 "A" 0 1 0 1 0 "" integer"#,
            r#"OK PRM 1 "A" 1 1 0 1 0 "" float"#,
            r#"OK PRM 1 "A" 1 1 zero 1 0 "" integer"#,
            r#"OK PRM 1 "A" 1 1 0 1 0 "" integer a b 1 extra"#,
            r#"OK PRM 1 "A 1 1 0 1 0 "" integer"#,
        ] {
            assert!(parse_record(line).is_err(), "{line} should be malformed");
        }
    }
}
