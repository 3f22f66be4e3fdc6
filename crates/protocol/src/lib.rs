//! Shared protocol crate for native-curve.
//!
//! This crate contains:
//! - Server -> client message decoding (lobby summaries, game snapshots)
//! - Client -> server command encoding
//! - Shared types (Direction, LobbyStatus, Point)

mod error;
pub mod messages;

pub use error::ProtocolError;
pub use messages::*;

/// A trail point in field coordinates.
pub type Point = (f32, f32);

/// Logical field width used when the server does not report one.
pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;

/// Logical field height used when the server does not report one.
pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;
