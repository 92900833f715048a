// Copyright (c) 2024 Mike Tsao

//! [ScpSession] is one live connection's worth of state: the catalog for the
//! configured console, the value cache, the host's feedback subscriptions,
//! and the macro recorder. Every operation returns the [SessionEvent]s that
//! the caller should act on; the session itself never touches a socket.

use crate::{
    catalog::Catalog,
    codec::{decode, encode, ActionInvocation, DecodedLine, LineFramer},
    dictionary::Dictionary,
    prelude::*,
    state::{FeedbackEvaluator, FeedbackSubscription, Macro, MacroRecorder, RenderDirective, ValueCache},
};
use anyhow::Context;
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// The most commonly used imports.
pub mod prelude {
    pub use super::{ScpSession, SessionEvent};
}

/// Asks the console who it is.
pub const PRODUCT_NAME_QUERY: &str = "devinfo productname";

/// Something the session wants done.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Send this line to the console.
    Send(String),
    /// Re-evaluate every subscription to this feedback.
    CheckFeedbacks(FeedbackId),
    /// The console told us its product name.
    DeviceIdentified(String),
    /// A macro recording finished.
    MacroRecorded(Macro),
    /// Recording started (true) or stopped (false).
    RecordingChanged(bool),
}

/// The state of one console connection.
#[derive(Debug)]
pub struct ScpSession {
    settings: ScpSettings,
    catalog: Arc<Catalog>,
    cache: ValueCache,
    framer: LineFramer,
    subscriptions: FxHashMap<SubscriptionId, FeedbackSubscription>,
    product_name: Option<String>,
    recorder: MacroRecorder,
}
impl ScpSession {
    /// Loads the dictionary the settings call for and builds its catalog.
    pub fn new_with(settings: ScpSettings) -> anyhow::Result<Self> {
        let catalog = Self::build_catalog(&settings)?;
        Ok(Self {
            settings,
            catalog,
            cache: ValueCache::default(),
            framer: LineFramer::default(),
            subscriptions: FxHashMap::default(),
            product_name: None,
            recorder: MacroRecorder::default(),
        })
    }

    fn build_catalog(settings: &ScpSettings) -> anyhow::Result<Arc<Catalog>> {
        let dictionary = Dictionary::for_settings(settings)
            .with_context(|| format!("loading the {} dictionary", settings.model()))?;
        info!(
            "{} dictionary: {:?}",
            settings.model(),
            dictionary.report()
        );
        Ok(Arc::new(Catalog::build(dictionary, settings)))
    }

    /// Replaces the settings and rebuilds the catalog from scratch. The cache
    /// is always cleared. If the new dictionary can't be loaded, nothing
    /// changes. Returns the queries that refresh every subscription.
    pub fn reload(&mut self, settings: ScpSettings) -> anyhow::Result<Vec<SessionEvent>> {
        let catalog = Self::build_catalog(&settings)?;
        self.catalog = catalog;
        self.settings = settings;
        self.cache.clear();
        let mut events = self.check_all();
        events.extend(self.repoll());
        Ok(events)
    }

    /// The transport just connected. Identifies the console and polls every
    /// subscription.
    pub fn connected(&mut self) -> Vec<SessionEvent> {
        self.framer.reset();
        let mut events = vec![SessionEvent::Send(PRODUCT_NAME_QUERY.to_string())];
        events.extend(self.repoll());
        events
    }

    /// The transport went away. Partial input is discarded, and the cache is
    /// cleared unless the settings say to retain it.
    pub fn disconnected(&mut self) -> Vec<SessionEvent> {
        self.framer.reset();
        match self.settings.cache_policy() {
            CachePolicy::ClearOnReconnect => {
                debug!("clearing {} cached values", self.cache.len());
                self.cache.clear();
                self.check_all()
            }
            CachePolicy::Retain => Vec::default(),
        }
    }

    /// Feeds raw inbound bytes through the framer and handles every complete
    /// line. Feedback checks are reported once per chunk.
    pub fn handle_data(&mut self, chunk: &[u8]) -> Vec<SessionEvent> {
        let mut events = Vec::default();
        let mut checked = FxHashSet::default();
        for line in self.framer.push(chunk) {
            for event in self.handle_line(&line) {
                if let SessionEvent::CheckFeedbacks(id) = &event {
                    if !checked.insert(*id) {
                        continue;
                    }
                }
                events.push(event);
            }
        }
        events
    }

    /// Handles one complete inbound line.
    pub fn handle_line(&mut self, line: &str) -> Vec<SessionEvent> {
        match decode(&self.catalog, line) {
            DecodedLine::Value(record) => {
                self.cache.apply(&record);
                if let Some(descriptor) = self.catalog.descriptor(record.index) {
                    self.recorder.record(descriptor, &record);
                }
                vec![SessionEvent::CheckFeedbacks(FeedbackId::Scp(record.index))]
            }
            DecodedLine::DeviceName(name) => {
                info!("connected to {name}");
                self.product_name = Some(name.clone());
                vec![SessionEvent::DeviceIdentified(name)]
            }
            DecodedLine::Error(_) | DecodedLine::Unmatched(_) | DecodedLine::Ignored => {
                Vec::default()
            }
        }
    }

    /// Runs a host action. Scene recalls also re-poll every subscription,
    /// since a scene changes most of the console at once.
    pub fn run_action(&mut self, invocation: &ActionInvocation) -> Vec<SessionEvent> {
        match invocation.action {
            ActionId::MacroRecordStart => {
                if !self.recorder.start() {
                    debug!("already recording a macro");
                    return Vec::default();
                }
                info!("recording a macro");
                vec![
                    SessionEvent::RecordingChanged(true),
                    SessionEvent::CheckFeedbacks(FeedbackId::MacroRecording),
                ]
            }
            ActionId::MacroRecordStop => match self.recorder.stop() {
                Some(recorded) => {
                    info!("recorded a macro with {} steps", recorded.len());
                    vec![
                        SessionEvent::RecordingChanged(false),
                        SessionEvent::CheckFeedbacks(FeedbackId::MacroRecording),
                        SessionEvent::MacroRecorded(recorded),
                    ]
                }
                None => Vec::default(),
            },
            ActionId::Scp(index) => {
                let Some(line) = encode(&self.catalog, invocation) else {
                    return Vec::default();
                };
                let mut events = vec![SessionEvent::Send(line)];
                let is_recall = invocation.verb == Verb::Set
                    && self
                        .catalog
                        .descriptor(index)
                        .is_some_and(|d| d.param_type == ParamType::Scene);
                if is_recall {
                    events.extend(self.repoll());
                }
                events
            }
        }
    }

    /// The lines that replay a recorded macro.
    pub fn play_macro(&self, recorded: &Macro) -> Vec<SessionEvent> {
        recorded
            .encode(&self.catalog)
            .into_iter()
            .map(SessionEvent::Send)
            .collect()
    }

    /// Starts watching a feedback. Returns the query that fetches its current
    /// state, if it has one.
    pub fn subscribe(
        &mut self,
        id: SubscriptionId,
        subscription: FeedbackSubscription,
    ) -> Vec<SessionEvent> {
        let query = subscription
            .query()
            .and_then(|q| encode(&self.catalog, &q))
            .map(SessionEvent::Send);
        let check = SessionEvent::CheckFeedbacks(subscription.feedback);
        self.subscriptions.insert(id, subscription);
        query.into_iter().chain(std::iter::once(check)).collect()
    }

    #[allow(missing_docs)]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<FeedbackSubscription> {
        self.subscriptions.remove(&id)
    }

    /// Evaluates one subscription. An unknown id leaves the button alone.
    pub fn evaluate(&self, id: SubscriptionId) -> RenderDirective {
        self.subscriptions
            .get(&id)
            .map(|s| self.evaluate_subscription(s))
            .unwrap_or(RenderDirective::Unchanged)
    }

    /// Evaluates a subscription that the session doesn't hold.
    pub fn evaluate_subscription(&self, subscription: &FeedbackSubscription) -> RenderDirective {
        FeedbackEvaluator::new_with(&self.catalog, &self.cache, self.recorder.is_recording())
            .evaluate(subscription)
    }

    /// Evaluates every subscription to one feedback, in subscription order.
    /// This is the answer to [SessionEvent::CheckFeedbacks].
    pub fn evaluate_feedback(&self, feedback: FeedbackId) -> Vec<(SubscriptionId, RenderDirective)> {
        let evaluator =
            FeedbackEvaluator::new_with(&self.catalog, &self.cache, self.recorder.is_recording());
        self.sorted_subscriptions()
            .into_iter()
            .filter(|(_, s)| s.feedback == feedback)
            .map(|(id, s)| (id, evaluator.evaluate(s)))
            .collect()
    }

    /// A `get` for every subscription, each distinct line once.
    pub fn repoll(&self) -> Vec<SessionEvent> {
        let mut seen = FxHashSet::default();
        self.sorted_subscriptions()
            .into_iter()
            .filter_map(|(_, s)| s.query())
            .filter_map(|q| encode(&self.catalog, &q))
            .filter(|line| seen.insert(line.clone()))
            .map(SessionEvent::Send)
            .collect()
    }

    /// Sends every [SessionEvent::Send] through the transport and returns the
    /// events that are left for the host.
    pub fn dispatch(
        events: Vec<SessionEvent>,
        transport: &mut impl Transport,
    ) -> anyhow::Result<Vec<SessionEvent>> {
        let mut rest = Vec::with_capacity(events.len());
        for event in events {
            match event {
                SessionEvent::Send(line) => transport.send_line(&line)?,
                event => rest.push(event),
            }
        }
        Ok(rest)
    }

    fn sorted_subscriptions(&self) -> Vec<(SubscriptionId, &FeedbackSubscription)> {
        let mut subscriptions: Vec<_> = self.subscriptions.iter().map(|(id, s)| (*id, s)).collect();
        subscriptions.sort_by_key(|(id, _)| id.0);
        subscriptions
    }

    fn check_all(&self) -> Vec<SessionEvent> {
        let mut seen = FxHashSet::default();
        self.sorted_subscriptions()
            .into_iter()
            .map(|(_, s)| s.feedback)
            .filter(|f| seen.insert(*f))
            .map(SessionEvent::CheckFeedbacks)
            .collect()
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &ScpSettings {
        &self.settings
    }

    /// The current catalog. A reload swaps in a new one; holders of the old
    /// one keep a consistent view.
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[allow(missing_docs)]
    pub fn cache(&self) -> &ValueCache {
        &self.cache
    }

    /// What the console said it was, if it has said.
    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    #[allow(missing_docs)]
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    #[allow(missing_docs)]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
