// Copyright (c) 2024 Mike Tsao

//! Identifiers for dictionary commands, catalog entries, and feedback
//! subscriptions, plus a factory that keeps minted ids unique.

use core::sync::atomic::Ordering;
use core::{fmt, hash::Hash, marker::PhantomData, str::FromStr, sync::atomic::AtomicUsize};
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// The console's own numeric id for a parameter. Stable per console model.
#[derive(Synonym, Serialize, Deserialize)]
pub struct CommandIndex(pub u32);

/// Identifies one feedback subscription that the host has registered.
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
#[synonym(skip(PartialEq))]
pub struct SubscriptionId(pub usize);
impl IsId for SubscriptionId {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Something that [IdFactory] can mint.
pub trait IsId: Eq + Hash + Clone + From<usize> {
    /// Returns the raw id.
    fn as_usize(&self) -> usize;
}

/// Generates unique ids.
#[derive(Debug)]
pub struct IdFactory<I: IsId> {
    next_id_value: AtomicUsize,
    _phantom: PhantomData<I>,
}
impl<I: IsId> Default for IdFactory<I> {
    fn default() -> Self {
        Self::new(1)
    }
}
impl<I: IsId> IdFactory<I> {
    /// Creates a new [IdFactory] starting with the given value.
    pub fn new(first_id: usize) -> Self {
        Self {
            next_id_value: AtomicUsize::new(first_id),
            _phantom: Default::default(),
        }
    }

    /// Generates the next unique id.
    pub fn mint_next(&self) -> I {
        I::from(self.next_id_value.fetch_add(1, Ordering::Relaxed))
    }

    /// Tells the factory about an id that was minted elsewhere, so that it
    /// never hands the same one out.
    pub fn notify_externally_minted_id(&self, id: I) {
        self.next_id_value
            .fetch_max(id.as_usize() + 1, Ordering::Relaxed);
    }
}

const SCP_PREFIX: &str = "scp_";

/// Names an entry in the action catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionId {
    /// Writes or reads a dictionary parameter.
    Scp(CommandIndex),
    /// Begins capturing console changes into a macro.
    MacroRecordStart,
    /// Ends the capture and hands the macro to the host.
    MacroRecordStop,
}
impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::Scp(index) => write!(f, "{SCP_PREFIX}{index}"),
            ActionId::MacroRecordStart => f.write_str("macro_record_start"),
            ActionId::MacroRecordStop => f.write_str("macro_record_stop"),
        }
    }
}
impl FromStr for ActionId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "macro_record_start" => Ok(Self::MacroRecordStart),
            "macro_record_stop" => Ok(Self::MacroRecordStop),
            _ => parse_scp_index(s).map(Self::Scp),
        }
    }
}

/// Names an entry in the feedback catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedbackId {
    /// Reflects the cached state of a dictionary parameter.
    Scp(CommandIndex),
    /// True while a macro is being recorded.
    MacroRecording,
}
impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackId::Scp(index) => write!(f, "{SCP_PREFIX}{index}"),
            FeedbackId::MacroRecording => f.write_str("macro_recording"),
        }
    }
}
impl FromStr for FeedbackId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "macro_recording" => Ok(Self::MacroRecording),
            _ => parse_scp_index(s).map(Self::Scp),
        }
    }
}

fn parse_scp_index(s: &str) -> Result<CommandIndex, IdParseError> {
    s.strip_prefix(SCP_PREFIX)
        .and_then(|n| n.parse::<u32>().ok())
        .map(CommandIndex)
        .ok_or_else(|| IdParseError(s.to_string()))
}

/// The string didn't name a known action or feedback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized catalog id: {0}")]
pub struct IdParseError(pub String);

// Ids travel to the host as their string forms.
macro_rules! serde_as_string {
    ($t:ty) => {
        impl Serialize for $t {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
serde_as_string!(ActionId);
serde_as_string!(FeedbackId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_parse_and_print() {
        assert_eq!(ActionId::Scp(CommandIndex(12)).to_string(), "scp_12");
        assert_eq!(
            "scp_12".parse::<ActionId>(),
            Ok(ActionId::Scp(CommandIndex(12)))
        );
        assert_eq!(
            "macro_record_stop".parse::<ActionId>(),
            Ok(ActionId::MacroRecordStop)
        );
        assert_eq!(
            "macro_recording".parse::<FeedbackId>(),
            Ok(FeedbackId::MacroRecording)
        );
        assert!("scp_".parse::<ActionId>().is_err());
        assert!("fader".parse::<FeedbackId>().is_err());
    }

    #[test]
    fn catalog_ids_serialize_as_strings() {
        let json = serde_json::to_string(&FeedbackId::Scp(CommandIndex(3))).unwrap();
        assert_eq!(json, "\"scp_3\"");
        let id: ActionId = serde_json::from_str("\"macro_record_start\"").unwrap();
        assert_eq!(id, ActionId::MacroRecordStart);
    }

    #[test]
    fn id_factory_with_notify_works() {
        let f = IdFactory::<SubscriptionId>::default();

        let id_1 = f.mint_next();
        let id_2 = f.mint_next();
        assert_ne!(id_1, id_2, "Minted ids should not repeat");

        let id_3 = SubscriptionId(id_2.0 + 1);
        f.notify_externally_minted_id(id_3);
        let id_4 = f.mint_next();
        assert_ne!(id_3, id_4, "Notifying factory should cause it to skip past.");

        f.notify_externally_minted_id(id_3);
        let id_5 = f.mint_next();
        assert_eq!(
            id_5.0,
            id_4.0 + 1,
            "Notifying factory about value below next should be no-op."
        );
    }
}
