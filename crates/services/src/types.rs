// Copyright (c) 2024 Mike Tsao

//! Data types shared among services.

use crossbeam::channel::{Receiver, Sender};

/// A convenience struct to bundle both halves of a crossbeam channel together.
#[derive(Debug)]
pub struct CrossbeamChannel<T> {
    #[allow(missing_docs)]
    pub sender: Sender<T>,
    #[allow(missing_docs)]
    pub receiver: Receiver<T>,
}
impl<T> Default for CrossbeamChannel<T> {
    fn default() -> Self {
        let (sender, receiver) = crossbeam::channel::unbounded();
        Self { sender, receiver }
    }
}

/// Where a transport connection stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportStatus {
    /// No connection, and none requested.
    Disconnected,
    /// A connection attempt is under way.
    Connecting,
    #[allow(missing_docs)]
    Connected,
    /// The connection attempt or the connection itself failed. There's no
    /// automatic retry; send another connect to try again.
    Failed(String),
}
