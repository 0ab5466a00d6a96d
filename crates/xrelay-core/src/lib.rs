//! Core of the Telegram → X relay.
//!
//! Framework-agnostic: Telegram and the X API live behind ports (traits)
//! implemented in adapter crates. A message flows through the [`router::Router`]
//! into either the [`publisher::Publisher`] or a relay to the manager chat, and
//! every handled message ends in exactly one [`notifier::Notifier`] call.

pub mod attachment;
pub mod clients;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod length;
pub mod logging;
pub mod notifier;
pub mod ports;
pub mod publisher;
pub mod router;
pub mod sanitize;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{Error, Result};
