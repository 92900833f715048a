// Copyright (c) 2024 Mike Tsao

#![warn(missing_docs)]
#![warn(unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! `scp-bridge` translates between the SCP text protocol that digital mixing
//! consoles speak and a structured catalog of actions and feedbacks that a
//! control surface can present.
//!
//! There are several ways to use it, depending on how much you want to own.
//!
//! * *Easiest*: create an [ScpSession] from [ScpSettings], feed it whatever
//! bytes arrive from the console with [ScpSession::handle_data()], and act on
//! the [SessionEvent]s it returns. The `scp-bridge-services` crate wraps this
//! in a thread with a TCP connection attached.
//! * *More control*: load a [Dictionary](dictionary::Dictionary), build a
//! [Catalog](catalog::Catalog) from it, and drive the [codec] and
//! [ValueCache](state::ValueCache) yourself.
//! * *Fewest batteries*: use [dictionary::tokenize()] and
//! [dictionary::parse_record()] to read the console's definition files
//! directly.

/// A collection of imports that are useful to users of this crate. `use
/// scp_bridge::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        catalog::prelude::*, codec::prelude::*, dictionary::prelude::*,
        session::prelude::*, state::prelude::*, traits::prelude::*, types::prelude::*,
        util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use {
    error::ScpError,
    session::{ScpSession, SessionEvent},
    util::ScpSettings,
};

pub mod catalog;
pub mod codec;
pub mod dictionary;
pub mod error;
pub mod session;
pub mod state;
pub mod traits;
pub mod types;
pub mod util;
