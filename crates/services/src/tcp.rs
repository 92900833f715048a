// Copyright (c) 2024 Mike Tsao

//! Provides a line-oriented TCP connection to a console.

use crate::{CrossbeamChannel, ProvidesService, TransportStatus};
use crossbeam::channel::{Receiver, Sender};
use scp_bridge::traits::Transport;
use std::{
    io::{Read, Write},
    net::{Shutdown, TcpStream, ToSocketAddrs},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_BUFFER_SIZE: usize = 4096;

/// The client drives the connection through [TcpTransportInput] messages.
#[derive(Clone, Debug)]
pub enum TcpTransportInput {
    /// Connects to `host:port`, dropping any existing connection first.
    Connect(String),
    /// Sends one line. The terminator is added here.
    Send(String),
    /// Closes the connection.
    Disconnect,
    /// The app is ready to quit, so the service should end.
    Quit,
}

/// The service reports back through [TcpTransportEvent] messages.
#[derive(Clone, Debug)]
pub enum TcpTransportEvent {
    #[allow(missing_docs)]
    StatusChanged(TransportStatus),
    /// Bytes arrived, in arrival order. Chunk boundaries mean nothing.
    Data(Vec<u8>),
    /// The service has processed [TcpTransportInput::Quit] and will go away
    /// shortly.
    Quit,
}

/// Wraps a [TcpStream] with a crossbeam-channels interface. Reads happen on a
/// dedicated thread; writes happen on the service thread.
#[derive(Debug)]
pub struct TcpTransportService {
    inputs: CrossbeamChannel<TcpTransportInput>,
    events: CrossbeamChannel<TcpTransportEvent>,
    connected: Arc<AtomicBool>,
}
impl Default for TcpTransportService {
    fn default() -> Self {
        Self::new()
    }
}
impl TcpTransportService {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
            connected: Default::default(),
        };
        r.spawn_thread();
        r
    }

    fn spawn_thread(&self) {
        let receiver = self.inputs.receiver.clone();
        let sender = self.events.sender.clone();
        let connected = Arc::clone(&self.connected);
        std::thread::spawn(move || {
            let mut daemon = TcpTransportDaemon::new_with(receiver, sender, connected);
            daemon.execute();
        });
    }

    /// A cloneable handle that implements [Transport] on top of this service.
    pub fn transport(&self) -> TcpTransport {
        TcpTransport {
            sender: self.inputs.sender.clone(),
            connected: Arc::clone(&self.connected),
        }
    }
}
impl ProvidesService<TcpTransportInput, TcpTransportEvent> for TcpTransportService {
    fn sender(&self) -> &Sender<TcpTransportInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<TcpTransportEvent> {
        &self.events.receiver
    }
}

/// Sends lines through a [TcpTransportService].
#[derive(Clone, Debug)]
pub struct TcpTransport {
    sender: Sender<TcpTransportInput>,
    connected: Arc<AtomicBool>,
}
impl Transport for TcpTransport {
    fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.sender
            .send(TcpTransportInput::Send(line.to_string()))
            .map_err(|_| anyhow::anyhow!("the transport service has stopped"))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

struct TcpTransportDaemon {
    receiver: Receiver<TcpTransportInput>,
    sender: Sender<TcpTransportEvent>,
    connected: Arc<AtomicBool>,
    stream: Option<TcpStream>,
    // Bumped whenever a connection is replaced or closed, so a reader thread
    // from an old connection doesn't report on the new one.
    generation: Arc<AtomicUsize>,
}
impl TcpTransportDaemon {
    fn new_with(
        receiver: Receiver<TcpTransportInput>,
        sender: Sender<TcpTransportEvent>,
        connected: Arc<AtomicBool>,
    ) -> Self {
        Self {
            receiver,
            sender,
            connected,
            stream: None,
            generation: Default::default(),
        }
    }

    fn execute(&mut self) {
        while let Ok(input) = self.receiver.recv() {
            match input {
                TcpTransportInput::Connect(address) => self.connect(&address),
                TcpTransportInput::Send(line) => self.send(&line),
                TcpTransportInput::Disconnect => {
                    if self.close() {
                        self.report(TransportStatus::Disconnected);
                    }
                }
                TcpTransportInput::Quit => {
                    self.close();
                    let _ = self.sender.send(TcpTransportEvent::Quit);
                    break;
                }
            }
        }
    }

    fn report(&self, status: TransportStatus) {
        self.connected
            .store(status == TransportStatus::Connected, Ordering::Relaxed);
        let _ = self.sender.send(TcpTransportEvent::StatusChanged(status));
    }

    fn connect(&mut self, address: &str) {
        self.close();
        self.report(TransportStatus::Connecting);
        match Self::open(address) {
            Ok(stream) => match stream.try_clone() {
                Ok(reader) => {
                    log::info!("connected to {address}");
                    self.stream = Some(stream);
                    self.spawn_reader(reader);
                    self.report(TransportStatus::Connected);
                }
                Err(e) => self.fail(address, e.into()),
            },
            Err(e) => self.fail(address, e),
        }
    }

    fn open(address: &str) -> anyhow::Result<TcpStream> {
        let addr = address
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| anyhow::anyhow!("{address} didn't resolve"))?;
        let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn fail(&mut self, address: &str, e: anyhow::Error) {
        log::warn!("connection to {address} failed: {e}");
        self.report(TransportStatus::Failed(e.to_string()));
    }

    fn spawn_reader(&self, mut reader: TcpStream) {
        let sender = self.sender.clone();
        let connected = Arc::clone(&self.connected);
        let generation = Arc::clone(&self.generation);
        let mine = generation.load(Ordering::Relaxed);
        std::thread::spawn(move || {
            let mut buffer = [0u8; READ_BUFFER_SIZE];
            let status = loop {
                match reader.read(&mut buffer) {
                    Ok(0) => break TransportStatus::Disconnected,
                    Ok(n) => {
                        // A replaced connection's bytes mustn't reach the new one's framer.
                        if generation.load(Ordering::Relaxed) != mine
                            || sender
                                .send(TcpTransportEvent::Data(buffer[..n].to_vec()))
                                .is_err()
                        {
                            return;
                        }
                    }
                    Err(e) => break TransportStatus::Failed(e.to_string()),
                }
            };
            // A deliberate close already reported itself.
            if generation.load(Ordering::Relaxed) == mine {
                log::info!("connection closed: {status:?}");
                connected.store(false, Ordering::Relaxed);
                let _ = sender.send(TcpTransportEvent::StatusChanged(status));
            }
        });
    }

    fn send(&mut self, line: &str) {
        let Some(stream) = self.stream.as_mut() else {
            log::debug!("not connected; dropping {line}");
            return;
        };
        log::trace!("-> {line}");
        let result = stream
            .write_all(line.as_bytes())
            .and_then(|_| stream.write_all(b"\n"));
        if let Err(e) = result {
            log::warn!("send failed: {e}");
            self.close();
            self.report(TransportStatus::Failed(e.to_string()));
        }
    }

    /// Returns whether there was a connection to close.
    fn close(&mut self) -> bool {
        self.generation.fetch_add(1, Ordering::Relaxed);
        match self.stream.take() {
            Some(stream) => {
                let _ = stream.shutdown(Shutdown::Both);
                self.connected.store(false, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{BufRead, BufReader},
        net::TcpListener,
    };

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn next_status(receiver: &Receiver<TcpTransportEvent>) -> TransportStatus {
        loop {
            match receiver.recv_timeout(TIMEOUT) {
                Ok(TcpTransportEvent::StatusChanged(status)) => return status,
                Ok(_) => continue,
                Err(e) => panic!("no status change: {e}"),
            }
        }
    }

    #[test]
    fn lines_flow_both_ways() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let service = TcpTransportService::default();
        let mut transport = service.transport();

        service.send_input(TcpTransportInput::Connect(address));
        let (console, _) = listener.accept().unwrap();
        assert_eq!(next_status(service.receiver()), TransportStatus::Connecting);
        assert_eq!(next_status(service.receiver()), TransportStatus::Connected);
        assert!(transport.is_connected());

        transport.send_line("devinfo productname").unwrap();
        let mut lines = BufReader::new(console.try_clone().unwrap()).lines();
        assert_eq!(lines.next().unwrap().unwrap(), "devinfo productname");

        (&console).write_all(b"OK devinfo productname CL5\n").unwrap();
        let mut received = Vec::default();
        while !received.ends_with(b"\n") {
            match service.receiver().recv_timeout(TIMEOUT).unwrap() {
                TcpTransportEvent::Data(bytes) => received.extend(bytes),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(received, b"OK devinfo productname CL5\n");

        drop(console);
        assert_eq!(next_status(service.receiver()), TransportStatus::Disconnected);
        assert!(!transport.is_connected());
    }

    #[test]
    fn replaced_connection_goes_quiet() {
        let old_listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let new_listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let service = TcpTransportService::default();

        service.send_input(TcpTransportInput::Connect(
            old_listener.local_addr().unwrap().to_string(),
        ));
        let (old_console, _) = old_listener.accept().unwrap();
        assert_eq!(next_status(service.receiver()), TransportStatus::Connecting);
        assert_eq!(next_status(service.receiver()), TransportStatus::Connected);

        service.send_input(TcpTransportInput::Connect(
            new_listener.local_addr().unwrap().to_string(),
        ));
        let (new_console, _) = new_listener.accept().unwrap();
        assert_eq!(next_status(service.receiver()), TransportStatus::Connecting);
        assert_eq!(next_status(service.receiver()), TransportStatus::Connected);

        // The old socket may already be shut down, so this can fail.
        let _ = (&old_console).write_all(b"NOTIFY set stale 0 0 1\n");
        (&new_console).write_all(b"NOTIFY set fresh 0 0 1\n").unwrap();

        let mut received = Vec::default();
        while !received.ends_with(b"\n") {
            match service.receiver().recv_timeout(TIMEOUT).unwrap() {
                TcpTransportEvent::Data(bytes) => received.extend(bytes),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(received, b"NOTIFY set fresh 0 0 1\n");
        drop(old_console);
        assert!(
            service.receiver().recv_timeout(Duration::from_millis(200)).is_err(),
            "the old connection shouldn't report anything"
        );
    }

    #[test]
    fn refused_connection_reports_failure() {
        // Bind and drop to find a port nobody is listening on.
        let address = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let service = TcpTransportService::default();
        service.send_input(TcpTransportInput::Connect(address));
        assert_eq!(next_status(service.receiver()), TransportStatus::Connecting);
        assert!(matches!(
            next_status(service.receiver()),
            TransportStatus::Failed(_)
        ));

        service.send_input(TcpTransportInput::Quit);
        assert!(matches!(
            service.receiver().recv_timeout(TIMEOUT),
            Ok(TcpTransportEvent::Quit)
        ));
    }
}
