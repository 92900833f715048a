// Copyright (c) 2024 Mike Tsao

//! Daemons that connect an [ScpSession](scp_bridge::ScpSession) to a console,
//! each running in its own thread and talking over crossbeam channels.

#![warn(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ConsoleService, ConsoleServiceEvent, ConsoleServiceInput, ProvidesService,
        TcpTransportEvent, TcpTransportInput, TcpTransportService, TransportStatus,
    };
}

pub use console::{ConsoleService, ConsoleServiceEvent, ConsoleServiceInput};
pub use tcp::{TcpTransport, TcpTransportEvent, TcpTransportInput, TcpTransportService};
pub use traits::ProvidesService;
pub use types::{CrossbeamChannel, TransportStatus};

mod console;
mod tcp;
mod traits;
mod types;
