// Copyright (c) 2024 Mike Tsao

//! Runs an [ScpSession] against a live console.

use crate::{
    CrossbeamChannel, ProvidesService, TcpTransport, TcpTransportEvent, TcpTransportInput,
    TcpTransportService, TransportStatus,
};
use crossbeam::channel::{Receiver, Select, Sender};
use scp_bridge::{prelude::*, types::IdFactory};
use std::sync::Arc;

/// The client sends requests to the console through [ConsoleServiceInput]
/// messages.
#[derive(Clone, Debug)]
pub enum ConsoleServiceInput {
    /// Connects to the address in the current settings.
    Connect,
    #[allow(missing_docs)]
    Disconnect,
    /// Replaces the settings and rebuilds the catalog.
    Reload(ScpSettings),
    /// Runs a catalog action.
    RunAction(ActionInvocation),
    /// Starts watching a feedback. The service answers with
    /// [ConsoleServiceEvent::Subscribed].
    Subscribe(FeedbackSubscription),
    #[allow(missing_docs)]
    Unsubscribe(SubscriptionId),
    /// Sends a recorded macro's lines to the console.
    PlayMacro(Macro),
    /// The app is ready to quit, so the service should end.
    Quit,
}

/// The service provides updates to the client through [ConsoleServiceEvent]
/// messages.
#[derive(Clone, Debug)]
pub enum ConsoleServiceEvent {
    /// A new catalog is in effect. Sent at startup and after each successful
    /// reload.
    CatalogReady(Arc<Catalog>),
    /// A reload failed; the previous catalog stays in effect.
    ReloadFailed(String),
    /// A subscription was accepted under this id.
    Subscribed(SubscriptionId, FeedbackId),
    /// A subscription's button should now look like this.
    Feedback(SubscriptionId, RenderDirective),
    #[allow(missing_docs)]
    DeviceIdentified(String),
    #[allow(missing_docs)]
    MacroRecorded(Macro),
    #[allow(missing_docs)]
    RecordingChanged(bool),
    #[allow(missing_docs)]
    StatusChanged(TransportStatus),
    /// The service has processed [ConsoleServiceInput::Quit] and will go away
    /// shortly.
    Quit,
}

/// Wraps an [ScpSession] and a [TcpTransportService] with a crossbeam-channels
/// interface.
#[derive(Debug)]
pub struct ConsoleService {
    inputs: CrossbeamChannel<ConsoleServiceInput>,
    events: CrossbeamChannel<ConsoleServiceEvent>,
}
impl ConsoleService {
    /// Fails if the settings' dictionary can't be loaded. Doesn't connect;
    /// send [ConsoleServiceInput::Connect] for that.
    pub fn new_with(settings: ScpSettings) -> anyhow::Result<Self> {
        let session = ScpSession::new_with(settings)?;
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
        };
        let _ = r
            .events
            .sender
            .send(ConsoleServiceEvent::CatalogReady(session.catalog()));
        r.spawn_thread(session);
        Ok(r)
    }

    fn spawn_thread(&self, session: ScpSession) {
        let receiver = self.inputs.receiver.clone();
        let sender = self.events.sender.clone();
        std::thread::spawn(move || {
            let mut daemon = ConsoleServiceDaemon::new_with(receiver, sender, session);
            daemon.execute();
        });
    }
}
impl ProvidesService<ConsoleServiceInput, ConsoleServiceEvent> for ConsoleService {
    fn sender(&self) -> &Sender<ConsoleServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<ConsoleServiceEvent> {
        &self.events.receiver
    }
}

struct ConsoleServiceDaemon {
    receiver: Receiver<ConsoleServiceInput>,
    sender: Sender<ConsoleServiceEvent>,
    session: ScpSession,
    tcp: TcpTransportService,
    transport: TcpTransport,
    subscription_ids: IdFactory<SubscriptionId>,
}
impl ConsoleServiceDaemon {
    fn new_with(
        receiver: Receiver<ConsoleServiceInput>,
        sender: Sender<ConsoleServiceEvent>,
        session: ScpSession,
    ) -> Self {
        let tcp = TcpTransportService::default();
        let transport = tcp.transport();
        Self {
            receiver,
            sender,
            session,
            tcp,
            transport,
            subscription_ids: Default::default(),
        }
    }

    fn execute(&mut self) {
        let inputs = self.receiver.clone();
        let transport_events = self.tcp.receiver().clone();
        let mut sel = Select::new();
        let input_index = sel.recv(&inputs);
        let transport_index = sel.recv(&transport_events);

        loop {
            let operation = sel.select();
            match operation.index() {
                index if index == input_index => {
                    let Ok(input) = ConsoleService::recv_operation(operation, &inputs) else {
                        break;
                    };
                    if !self.handle_input(input) {
                        break;
                    }
                }
                index if index == transport_index => {
                    let Ok(event) = ConsoleService::recv_operation(operation, &transport_events)
                    else {
                        break;
                    };
                    self.handle_transport_event(event);
                }
                _ => {
                    panic!("missing case for a new receiver")
                }
            }
        }
    }

    /// Returns false when it's time to stop.
    fn handle_input(&mut self, input: ConsoleServiceInput) -> bool {
        match input {
            ConsoleServiceInput::Connect => {
                let address = self.session.settings().address();
                self.tcp.send_input(TcpTransportInput::Connect(address));
            }
            ConsoleServiceInput::Disconnect => {
                self.tcp.send_input(TcpTransportInput::Disconnect);
            }
            ConsoleServiceInput::Reload(settings) => match self.session.reload(settings) {
                Ok(events) => {
                    self.emit(ConsoleServiceEvent::CatalogReady(self.session.catalog()));
                    self.forward(events);
                }
                Err(e) => {
                    log::warn!("reload failed: {e:#}");
                    self.emit(ConsoleServiceEvent::ReloadFailed(format!("{e:#}")));
                }
            },
            ConsoleServiceInput::RunAction(invocation) => {
                let events = self.session.run_action(&invocation);
                self.forward(events);
            }
            ConsoleServiceInput::Subscribe(subscription) => {
                let id = self.subscription_ids.mint_next();
                self.emit(ConsoleServiceEvent::Subscribed(id, subscription.feedback));
                let events = self.session.subscribe(id, subscription);
                self.forward(events);
            }
            ConsoleServiceInput::Unsubscribe(id) => {
                self.session.unsubscribe(id);
            }
            ConsoleServiceInput::PlayMacro(recorded) => {
                let events = self.session.play_macro(&recorded);
                self.forward(events);
            }
            ConsoleServiceInput::Quit => {
                self.tcp.send_input(TcpTransportInput::Quit);
                self.emit(ConsoleServiceEvent::Quit);
                return false;
            }
        }
        true
    }

    fn handle_transport_event(&mut self, event: TcpTransportEvent) {
        match event {
            TcpTransportEvent::Data(bytes) => {
                let events = self.session.handle_data(&bytes);
                self.forward(events);
            }
            TcpTransportEvent::StatusChanged(status) => {
                let events = match status {
                    TransportStatus::Connected => self.session.connected(),
                    TransportStatus::Disconnected | TransportStatus::Failed(_) => {
                        self.session.disconnected()
                    }
                    TransportStatus::Connecting => Vec::default(),
                };
                self.emit(ConsoleServiceEvent::StatusChanged(status));
                self.forward(events);
            }
            TcpTransportEvent::Quit => {}
        }
    }

    /// Sends the session's lines to the console and turns the rest into
    /// client events.
    fn forward(&mut self, events: Vec<SessionEvent>) {
        let events = match ScpSession::dispatch(events, &mut self.transport) {
            Ok(events) => events,
            Err(e) => {
                log::error!("{e:#}");
                return;
            }
        };
        for event in events {
            match event {
                SessionEvent::CheckFeedbacks(feedback) => {
                    for (id, directive) in self.session.evaluate_feedback(feedback) {
                        self.emit(ConsoleServiceEvent::Feedback(id, directive));
                    }
                }
                SessionEvent::DeviceIdentified(name) => {
                    self.emit(ConsoleServiceEvent::DeviceIdentified(name))
                }
                SessionEvent::MacroRecorded(recorded) => {
                    self.emit(ConsoleServiceEvent::MacroRecorded(recorded))
                }
                SessionEvent::RecordingChanged(recording) => {
                    self.emit(ConsoleServiceEvent::RecordingChanged(recording))
                }
                SessionEvent::Send(_) => {}
            }
        }
    }

    fn emit(&self, event: ConsoleServiceEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        time::Duration,
    };

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn wait_for<T>(
        service: &ConsoleService,
        mut pick: impl FnMut(ConsoleServiceEvent) -> Option<T>,
    ) -> T {
        loop {
            match service.receiver().recv_timeout(TIMEOUT) {
                Ok(event) => {
                    if let Some(t) = pick(event) {
                        return t;
                    }
                }
                Err(e) => panic!("timed out waiting for an event: {e}"),
            }
        }
    }

    #[test]
    fn console_round_trip() {
        let _ = env_logger::builder().is_test(true).try_init();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut settings = ScpSettings::new_with("127.0.0.1", ConsoleModel::ClQl);
        settings.set_port(listener.local_addr().unwrap().port());

        let service = ConsoleService::new_with(settings).unwrap();
        wait_for(&service, |e| match e {
            ConsoleServiceEvent::CatalogReady(catalog) => Some(catalog),
            _ => None,
        });

        service.send_input(ConsoleServiceInput::Subscribe(
            FeedbackSubscriptionBuilder::default()
                .feedback(FeedbackId::Scp(CommandIndex(0)))
                .x(5i64)
                .val(250i64)
                .build()
                .unwrap(),
        ));
        let id = wait_for(&service, |e| match e {
            ConsoleServiceEvent::Subscribed(id, _) => Some(id),
            _ => None,
        });

        service.send_input(ConsoleServiceInput::Connect);
        let (console, _) = listener.accept().unwrap();
        let mut lines = BufReader::new(console.try_clone().unwrap()).lines();
        assert_eq!(lines.next().unwrap().unwrap(), "devinfo productname");
        assert_eq!(
            lines.next().unwrap().unwrap(),
            "get MIXER:Current/InCh/Fader/Level 4 0"
        );

        (&console)
            .write_all(b"OK devinfo productname CL5\nNOTIFY set MIXER:Current/InCh/Fader/Level 4 0 250\n")
            .unwrap();
        let name = wait_for(&service, |e| match e {
            ConsoleServiceEvent::DeviceIdentified(name) => Some(name),
            _ => None,
        });
        assert_eq!(name, "CL5");
        // The subscription was evaluated once already, against an empty cache.
        wait_for(&service, |e| match e {
            ConsoleServiceEvent::Feedback(fid, directive) if fid == id && directive.is_active() => {
                Some(())
            }
            _ => None,
        });

        service.send_input(ConsoleServiceInput::Quit);
        wait_for(&service, |e| match e {
            ConsoleServiceEvent::Quit => Some(()),
            _ => None,
        });
    }

    #[test]
    fn failed_reload_is_reported() {
        let service =
            ConsoleService::new_with(ScpSettings::new_with("127.0.0.1", ConsoleModel::Tf))
                .unwrap();
        let mut settings = ScpSettings::new_with("127.0.0.1", ConsoleModel::Tf);
        settings.set_dictionary_path(Some("/nonexistent/tf.txt".into()));
        service.send_input(ConsoleServiceInput::Reload(settings));
        wait_for(&service, |e| match e {
            ConsoleServiceEvent::ReloadFailed(_) => Some(()),
            _ => None,
        });
    }
}
