// Copyright (c) 2024 Mike Tsao

use super::{bank_letter, bank_number, ActionInvocation};
use crate::{catalog::Catalog, prelude::*, util::ChannelAliases};
use log::{debug, warn};

/// Encodes an invocation against a catalog. Returns [None], after logging,
/// for the macro controls (they have no wire form), an unknown command, or an
/// unresolvable channel.
pub fn encode(catalog: &Catalog, invocation: &ActionInvocation) -> Option<String> {
    let ActionId::Scp(index) = invocation.action else {
        debug!("{} has no wire form", invocation.action);
        return None;
    };
    let Some(descriptor) = catalog.descriptor(index) else {
        warn!("unknown command {}", invocation.action);
        return None;
    };
    encode_with(descriptor, catalog.model(), catalog.aliases(), invocation)
}

/// Encodes an invocation against a single descriptor.
pub fn encode_with(
    descriptor: &CommandDescriptor,
    model: ConsoleModel,
    aliases: &ChannelAliases,
    invocation: &ActionInvocation,
) -> Option<String> {
    match descriptor.param_type {
        ParamType::Scene => Some(encode_scene(descriptor, model, invocation)),
        ParamType::Integer | ParamType::Binary | ParamType::String => {
            encode_parameter(descriptor, aliases, invocation)
        }
    }
}

fn encode_parameter(
    descriptor: &CommandDescriptor,
    aliases: &ChannelAliases,
    invocation: &ActionInvocation,
) -> Option<String> {
    let x = match &invocation.x {
        Some(requested) => {
            let Some(requested) = requested.as_number() else {
                warn!("{}: X must be a number, got {requested:?}", descriptor.address);
                return None;
            };
            let Some(channel) = aliases.resolve(requested) else {
                warn!("{}: channel alias {requested} isn't assigned", descriptor.address);
                return None;
            };
            wire_coordinate(channel)
        }
        None => 0,
    };
    let y = invocation
        .y
        .as_ref()
        .and_then(OptionValue::as_number)
        .map(wire_coordinate)
        .unwrap_or_default();
    let value = match invocation.verb {
        Verb::Set => wire_value(descriptor, invocation.val.as_ref()),
        Verb::Get => String::default(),
    };

    Some(join(&[
        invocation.verb.to_string(),
        descriptor.address.clone(),
        x.to_string(),
        y.to_string(),
        value,
    ]))
}

/// Scenes are addressed by number with no coordinate arithmetic. TF consoles
/// fold the bank letter into the address.
fn encode_scene(
    descriptor: &CommandDescriptor,
    model: ConsoleModel,
    invocation: &ActionInvocation,
) -> String {
    let address = match model {
        ConsoleModel::ClQl => descriptor.address.clone(),
        ConsoleModel::Tf => format!(
            "{}{}",
            descriptor.address,
            bank_letter(bank_number(invocation.y.as_ref()))
        ),
    };
    match invocation.verb {
        Verb::Set => {
            let scene = invocation
                .x
                .as_ref()
                .and_then(OptionValue::as_number)
                .map(|n| n.to_string())
                .unwrap_or_default();
            join(&["ssrecall_ex".to_string(), address, scene])
        }
        Verb::Get => join(&["sscurrent_ex".to_string(), address]),
    }
}

fn wire_coordinate(n: i64) -> i64 {
    (n - 1).max(0)
}

/// The value token for a `set`. Falls back to the descriptor's default when
/// the invocation carries none.
fn wire_value(descriptor: &CommandDescriptor, value: Option<&OptionValue>) -> String {
    let value = value
        .cloned()
        .unwrap_or_else(|| descriptor.default.clone().into());
    let bare = match value {
        OptionValue::Bool(b) => i64::from(b).to_string(),
        OptionValue::Number(n) => n.to_string(),
        OptionValue::Text(t) => t,
    };
    match descriptor.param_type {
        ParamType::String => format!("\"{bare}\""),
        _ => bare.trim().to_string(),
    }
}

fn join(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
