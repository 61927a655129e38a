//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Transport start
//!     → listener.rs (normalise address, bind, log local address)
//!     → serve loop owned by the transport
//!
//! Admin connections only:
//!     → idle.rs (close connections silent for longer than the idle timeout)
//! ```

pub mod idle;
pub mod listener;
