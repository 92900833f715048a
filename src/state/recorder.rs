// Copyright (c) 2024 Mike Tsao

use crate::{
    catalog::Catalog,
    codec::{encode, ActionInvocation, ValueRecord},
    prelude::*,
};
use serde::{Deserialize, Serialize};

/// A recorded sequence of `set` invocations, ready to replay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Macro {
    steps: Vec<ActionInvocation>,
}
impl Macro {
    #[allow(missing_docs)]
    pub fn steps(&self) -> &[ActionInvocation] {
        &self.steps
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The wire lines that replay this macro. Steps whose command no longer
    /// exists in the catalog are skipped.
    pub fn encode(&self, catalog: &Catalog) -> Vec<String> {
        self.steps
            .iter()
            .filter_map(|step| encode(catalog, step))
            .collect()
    }
}

/// Captures console changes while recording. Only the latest value at each
/// coordinate is kept, in the order the coordinates were first touched.
#[derive(Debug, Default)]
pub struct MacroRecorder {
    steps: Option<Vec<ActionInvocation>>,
}
impl MacroRecorder {
    /// Returns false if a recording was already under way.
    pub fn start(&mut self) -> bool {
        if self.steps.is_some() {
            return false;
        }
        self.steps = Some(Vec::default());
        true
    }

    /// Ends the recording. [None] if nothing was being recorded.
    pub fn stop(&mut self) -> Option<Macro> {
        self.steps.take().map(|steps| Macro { steps })
    }

    #[allow(missing_docs)]
    pub fn is_recording(&self) -> bool {
        self.steps.is_some()
    }

    /// Records a decoded value. Returns whether it was captured; scene changes
    /// and anything outside a recording aren't.
    pub fn record(&mut self, descriptor: &CommandDescriptor, record: &ValueRecord) -> bool {
        let Some(steps) = self.steps.as_mut() else {
            return false;
        };
        if descriptor.param_type == ParamType::Scene {
            return false;
        }
        let (x, y) = record.coordinates();
        let step = ActionInvocation {
            action: ActionId::Scp(descriptor.index),
            verb: Verb::Set,
            x: descriptor
                .has_x_axis()
                .then(|| OptionValue::Number(i64::from(x))),
            y: descriptor
                .has_y_axis()
                .then(|| OptionValue::Number(i64::from(y))),
            val: Some(record.val.clone().into()),
        };
        match steps
            .iter_mut()
            .find(|s| s.action == step.action && s.x == step.x && s.y == step.y)
        {
            Some(existing) => existing.val = step.val,
            None => steps.push(step),
        }
        true
    }
}
