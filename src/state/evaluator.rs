// Copyright (c) 2024 Mike Tsao

use super::ValueCache;
use crate::{
    catalog::{Catalog, OptionKey},
    codec::{bank_number, ActionInvocation},
    prelude::*,
    types::Palette,
};
use derive_builder::Builder;
use log::debug;
use serde::{Deserialize, Serialize};

fn active_style() -> ButtonStyle {
    ButtonStyle::ACTIVE
}

/// A feedback the host has placed on a button, with the option values from
/// its form.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(rename_all = "kebab-case")]
pub struct FeedbackSubscription {
    #[allow(missing_docs)]
    pub feedback: FeedbackId,
    /// Expected first coordinate, 1-based, or a channel alias sentinel. For
    /// scenes, the expected scene number.
    #[builder(default, setter(into, strip_option))]
    #[serde(rename = "X", default, skip_serializing_if = "Option::is_none")]
    pub x: Option<OptionValue>,
    /// Expected second coordinate, or scene bank. Defaults to 1.
    #[builder(default, setter(into, strip_option))]
    #[serde(rename = "Y", default, skip_serializing_if = "Option::is_none")]
    pub y: Option<OptionValue>,
    /// Expected value. Defaults to the parameter's own default.
    #[builder(default, setter(into, strip_option))]
    #[serde(rename = "Val", default, skip_serializing_if = "Option::is_none")]
    pub val: Option<OptionValue>,
    /// Shown when the cached value matches.
    #[builder(default = "ButtonStyle::ACTIVE")]
    #[serde(default = "active_style")]
    pub active: ButtonStyle,
    /// Shown when it doesn't.
    #[builder(default)]
    #[serde(default)]
    pub inactive: ButtonStyle,
}
impl FeedbackSubscription {
    /// Builds a subscription from the option map a host stores for a placed
    /// feedback. Unknown keys are ignored.
    pub fn with_options(
        feedback: FeedbackId,
        options: impl IntoIterator<Item = (OptionKey, OptionValue)>,
    ) -> Self {
        let mut subscription = Self {
            feedback,
            x: None,
            y: None,
            val: None,
            active: ButtonStyle::ACTIVE,
            inactive: ButtonStyle::DEFAULT,
        };
        for (key, value) in options {
            let rgb = || {
                value
                    .as_number()
                    .and_then(|n| u32::try_from(n).ok())
                    .map(Rgb)
            };
            match key {
                OptionKey::X => subscription.x = Some(value),
                OptionKey::Y => subscription.y = Some(value),
                OptionKey::Val => subscription.val = Some(value),
                OptionKey::Fg => {
                    if let Some(rgb) = rgb() {
                        subscription.active.color = rgb;
                    }
                }
                OptionKey::Bg => {
                    if let Some(rgb) = rgb() {
                        subscription.active.bgcolor = rgb;
                    }
                }
            }
        }
        subscription
    }

    /// The `get` that refreshes this subscription's parameter, if it has one.
    pub fn query(&self) -> Option<ActionInvocation> {
        match self.feedback {
            FeedbackId::Scp(index) => Some(ActionInvocation {
                action: ActionId::Scp(index),
                verb: Verb::Get,
                x: self.x.clone(),
                y: self.y.clone(),
                val: None,
            }),
            FeedbackId::MacroRecording => None,
        }
    }
}

/// What the host should do to a button after evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderDirective {
    /// Nothing is known yet; leave the button alone.
    Unchanged,
    /// The expected state holds.
    Active(ButtonStyle),
    /// The expected state doesn't hold.
    Inactive(ButtonStyle),
    /// Paint the button in a channel colour.
    Color(ButtonStyle),
    /// Show this text on the button.
    Label(String),
}
impl RenderDirective {
    /// Whether the host should treat the feedback as "on".
    pub fn is_active(&self) -> bool {
        matches!(self, RenderDirective::Active(_))
    }
}

/// Evaluates subscriptions against the cache. Cheap to construct; make one
/// whenever feedbacks need checking.
pub struct FeedbackEvaluator<'a> {
    catalog: &'a Catalog,
    cache: &'a ValueCache,
    recording: bool,
}
impl<'a> FeedbackEvaluator<'a> {
    #[allow(missing_docs)]
    pub fn new_with(catalog: &'a Catalog, cache: &'a ValueCache, recording: bool) -> Self {
        Self {
            catalog,
            cache,
            recording,
        }
    }

    #[allow(missing_docs)]
    pub fn evaluate(&self, subscription: &FeedbackSubscription) -> RenderDirective {
        match subscription.feedback {
            FeedbackId::Scp(index) => self.evaluate_command(index, subscription),
            FeedbackId::MacroRecording => {
                if self.recording {
                    RenderDirective::Active(subscription.active)
                } else {
                    RenderDirective::Inactive(subscription.inactive)
                }
            }
        }
    }

    fn evaluate_command(
        &self,
        index: CommandIndex,
        subscription: &FeedbackSubscription,
    ) -> RenderDirective {
        let Some(descriptor) = self.catalog.descriptor(index) else {
            debug!("feedback for unknown command {index}");
            return RenderDirective::Unchanged;
        };
        let (x, y, expected) = match descriptor.param_type {
            // Scenes cache their number as the value at X = 1.
            ParamType::Scene => {
                let y = match self.catalog.model() {
                    ConsoleModel::ClQl => 1,
                    ConsoleModel::Tf => bank_number(subscription.y.as_ref()),
                };
                (1, y, subscription.x.clone())
            }
            ParamType::Integer | ParamType::Binary | ParamType::String => {
                let Some(x) = self.resolve_x(subscription.x.as_ref()) else {
                    return RenderDirective::Unchanged;
                };
                let y = subscription
                    .y
                    .as_ref()
                    .and_then(OptionValue::as_number)
                    .and_then(|n| u32::try_from(n.max(1)).ok())
                    .unwrap_or(1);
                (x, y, subscription.val.clone())
            }
        };
        let Some(cached) = self.cache.get(index, x, y) else {
            return RenderDirective::Unchanged;
        };

        match descriptor.role() {
            CommandRole::Color => Palette::for_model(self.catalog.model())
                .resolve(cached)
                .map(|color| RenderDirective::Color(color.style()))
                .unwrap_or(RenderDirective::Unchanged),
            CommandRole::Name => RenderDirective::Label(cached.to_string()),
            CommandRole::Ordinary => {
                let expected = expected.unwrap_or_else(|| descriptor.default.clone().into());
                if cached.matches(&expected) {
                    RenderDirective::Active(subscription.active)
                } else {
                    RenderDirective::Inactive(subscription.inactive)
                }
            }
        }
    }

    fn resolve_x(&self, x: Option<&OptionValue>) -> Option<u32> {
        let Some(x) = x else {
            return Some(1);
        };
        let requested = x.as_number()?;
        let Some(channel) = self.catalog.aliases().resolve(requested) else {
            debug!("channel alias {requested} isn't assigned");
            return None;
        };
        u32::try_from(channel.max(1)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;

    const DICTIONARY: &str = r#"
OK PRM 12 "MIXER:Current/InCh/Fader/Level" 72 1 0 1000 0 "dB" integer 1 1
OK PRM 1 "MIXER:Current/InCh/Fader/On" 72 1 0 1 1 "" integer any rw 1
OK PRM 7 "MIXER:Current/InCh/Label/Name" 72 1 0 8 "" "" string any rw 1
OK PRM 8 "MIXER:Current/InCh/Label/Color" 72 1 0 0 "Blue" "" string any rw 1
OK scninfo 1000 "scene_" 100 2 0 99 0 "" scene any rw 1
"#;

    fn catalog(model: ConsoleModel) -> Catalog {
        let mut settings = ScpSettings::new_with("127.0.0.1", model);
        settings.set_channel_alias(1, "Lead Vox", Some(5));
        Catalog::build(Dictionary::parse(DICTIONARY), &settings)
    }

    fn subscription(index: u32, x: i64, val: impl Into<OptionValue>) -> FeedbackSubscription {
        FeedbackSubscriptionBuilder::default()
            .feedback(FeedbackId::Scp(CommandIndex(index)))
            .x(x)
            .val(val)
            .build()
            .unwrap()
    }

    #[test]
    fn matches_expected_value() {
        let catalog = catalog(ConsoleModel::ClQl);
        let mut cache = ValueCache::default();
        let sub = subscription(12, 5, 250i64);
        let evaluator = FeedbackEvaluator::new_with(&catalog, &cache, false);
        assert_eq!(evaluator.evaluate(&sub), RenderDirective::Unchanged);

        cache.insert(CommandIndex(12), 5, 1, ScpValue::Int(250));
        let evaluator = FeedbackEvaluator::new_with(&catalog, &cache, false);
        assert_eq!(
            evaluator.evaluate(&sub),
            RenderDirective::Active(ButtonStyle::ACTIVE)
        );
        assert_eq!(
            evaluator.evaluate(&subscription(12, 5, 300i64)),
            RenderDirective::Inactive(ButtonStyle::DEFAULT)
        );
        assert!(
            evaluator.evaluate(&subscription(12, -1, 250i64)).is_active(),
            "alias 1 points at channel 5"
        );
        assert_eq!(
            evaluator.evaluate(&subscription(12, -2, 250i64)),
            RenderDirective::Unchanged,
            "alias 2 is unassigned"
        );
    }

    #[test]
    fn booleans_match_zero_and_one() {
        let catalog = catalog(ConsoleModel::ClQl);
        let mut cache = ValueCache::default();
        cache.insert(CommandIndex(1), 3, 1, ScpValue::Int(0));
        let evaluator = FeedbackEvaluator::new_with(&catalog, &cache, false);
        assert!(evaluator.evaluate(&subscription(1, 3, false)).is_active());
        assert!(!evaluator.evaluate(&subscription(1, 3, true)).is_active());
    }

    #[test]
    fn names_and_colors_show_cached_state() {
        let catalog = catalog(ConsoleModel::ClQl);
        let mut cache = ValueCache::default();
        cache.insert(CommandIndex(7), 2, 1, ScpValue::Text("Kick".into()));
        cache.insert(CommandIndex(8), 2, 1, ScpValue::Text("Yellow".into()));
        let evaluator = FeedbackEvaluator::new_with(&catalog, &cache, false);
        let by_channel = |index: u32| {
            FeedbackSubscription::with_options(
                FeedbackId::Scp(CommandIndex(index)),
                [(OptionKey::X, OptionValue::Number(2))],
            )
        };
        assert_eq!(
            evaluator.evaluate(&by_channel(7)),
            RenderDirective::Label("Kick".into())
        );
        assert_eq!(
            evaluator.evaluate(&by_channel(8)),
            RenderDirective::Color(ChannelColor::Yellow.style())
        );
    }

    #[test]
    fn tf_scene_compares_number_per_bank() {
        let catalog = catalog(ConsoleModel::Tf);
        let mut cache = ValueCache::default();
        cache.insert(CommandIndex(1000), 1, 2, ScpValue::Int(7));
        let evaluator = FeedbackEvaluator::new_with(&catalog, &cache, false);
        let scene = |number: i64, bank: &str| {
            FeedbackSubscription::with_options(
                FeedbackId::Scp(CommandIndex(1000)),
                [
                    (OptionKey::X, OptionValue::Number(number)),
                    (OptionKey::Y, OptionValue::Text(bank.into())),
                ],
            )
        };
        assert!(evaluator.evaluate(&scene(7, "b")).is_active());
        assert!(!evaluator.evaluate(&scene(6, "b")).is_active());
        assert_eq!(evaluator.evaluate(&scene(7, "a")), RenderDirective::Unchanged);
    }

    #[test]
    fn recording_feedback_follows_recorder() {
        let catalog = catalog(ConsoleModel::ClQl);
        let cache = ValueCache::default();
        let sub = FeedbackSubscription::with_options(
            FeedbackId::MacroRecording,
            [(OptionKey::Bg, OptionValue::Number(0x00ff00))],
        );
        assert_eq!(
            FeedbackEvaluator::new_with(&catalog, &cache, true).evaluate(&sub),
            RenderDirective::Active(ButtonStyle {
                color: Rgb::WHITE,
                bgcolor: Rgb(0x00ff00)
            })
        );
        assert!(!FeedbackEvaluator::new_with(&catalog, &cache, false)
            .evaluate(&sub)
            .is_active());
        assert!(sub.query().is_none());
    }

    #[test]
    fn subscriptions_know_their_query() {
        let query = subscription(12, 5, 250i64).query().unwrap();
        assert_eq!(query.verb, Verb::Get);
        assert_eq!(query.x, Some(OptionValue::Number(5)));
        assert_eq!(query.val, None);
    }
}
