// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// The console families that this crate knows how to address. They share a
/// protocol but differ in scene addressing and in their colour palettes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ConsoleModel {
    /// CL and QL series.
    #[default]
    #[serde(rename = "CL/QL")]
    #[strum(serialize = "CL/QL")]
    ClQl,
    /// TF series.
    #[serde(rename = "TF")]
    #[strum(serialize = "TF")]
    Tf,
}
impl ConsoleModel {
    /// The file name of this model's bundled parameter dictionary.
    pub fn dictionary_file_name(&self) -> &'static str {
        match self {
            ConsoleModel::ClQl => "cl_ql.txt",
            ConsoleModel::Tf => "tf.txt",
        }
    }
}

/// The `Type` column of a dictionary record. Drives both option synthesis and
/// wire encoding, and every match on it is exhaustive.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, Hash, PartialEq, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[allow(missing_docs)]
    Integer,
    #[allow(missing_docs)]
    String,
    /// Opaque data that travels unquoted.
    Binary,
    /// A scene memory; addressed by position rather than by value.
    Scene,
}

/// Whether an outbound request writes or reads a parameter.
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    #[default]
    #[allow(missing_docs)]
    Set,
    #[allow(missing_docs)]
    Get,
}
