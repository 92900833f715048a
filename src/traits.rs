// Copyright (c) 2024 Mike Tsao

//! The traits that sit at the seams between the protocol core and the world
//! around it.

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{HasSettings, Transport};
}

/// Some structs have configuration information that persists beyond a single
/// session. Implementing [HasSettings] lets the owner know when that
/// information needs to be written back to disk.
pub trait HasSettings {
    /// Whether the current state of this struct has been saved to disk.
    fn has_been_saved(&self) -> bool;
    /// Call this whenever the struct changes.
    fn needs_save(&mut self);
    /// Call this after a load() or a save().
    fn mark_clean(&mut self);
}

/// Carries outbound SCP lines to a console. Sends are fire-and-forget: there
/// is no reply correlation at this level.
pub trait Transport {
    /// Queues one line for delivery. The implementation adds the line
    /// terminator.
    fn send_line(&mut self, line: &str) -> anyhow::Result<()>;

    /// Whether lines sent now have a chance of reaching the console.
    fn is_connected(&self) -> bool {
        true
    }
}

/// Collects lines in memory. Handy for tests and for capturing a macro.
impl Transport for Vec<String> {
    fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}
