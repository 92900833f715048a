// Copyright (c) 2024 Mike Tsao

//! What the bridge remembers about the console between lines: the last value
//! seen at each parameter coordinate, the feedbacks the host has asked to
//! watch, and any macro being recorded.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        FeedbackEvaluator, FeedbackSubscription, FeedbackSubscriptionBuilder, Macro,
        MacroRecorder, RenderDirective, ValueCache,
    };
}

pub use {
    cache::ValueCache,
    evaluator::{FeedbackEvaluator, FeedbackSubscription, FeedbackSubscriptionBuilder, RenderDirective},
    recorder::{Macro, MacroRecorder},
};

mod cache;
mod evaluator;
mod recorder;
