//! Minecraft player identifier codec
//!
//! Converts the dashless 32-hex-digit identifiers returned by the Mojang API
//! into canonical UUIDs and checks username syntax.

mod error;
mod player_id;
mod username;

pub use error::{MalformedIdentifier, Result};
pub use player_id::{decode, PlayerId};
pub use username::is_valid_username;
