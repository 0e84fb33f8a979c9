use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MalformedIdentifier, Result};

const SIMPLE_LEN: usize = 32;
const HYPHENATED_LEN: usize = 36;
const DASH_OFFSETS: [usize; 4] = [8, 13, 18, 23];

/// Stable account identifier of a Minecraft player
///
/// Displays (and serializes) in the canonical dashed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The dashless form the Mojang API uses on the wire
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

/// Decode a dashless 32-hex-digit identifier as returned by the Mojang API
pub fn decode(raw: &str) -> Result<PlayerId> {
    if raw.len() != SIMPLE_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MalformedIdentifier::new(raw));
    }
    Uuid::try_parse(raw)
        .map(PlayerId)
        .map_err(|_| MalformedIdentifier::new(raw))
}

impl FromStr for PlayerId {
    type Err = MalformedIdentifier;

    /// Accepts both the dashless and the canonical dashed form.
    fn from_str(s: &str) -> Result<Self> {
        match s.len() {
            SIMPLE_LEN => decode(s),
            HYPHENATED_LEN => {
                let dashes_in_place = DASH_OFFSETS.iter().all(|&i| s.as_bytes()[i] == b'-');
                if !dashes_in_place {
                    return Err(MalformedIdentifier::new(s));
                }
                let simple: String = s.chars().filter(|c| *c != '-').collect();
                decode(&simple).map_err(|_| MalformedIdentifier::new(s))
            }
            _ => Err(MalformedIdentifier::new(s)),
        }
    }
}

impl From<Uuid> for PlayerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PlayerId> for Uuid {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIKROSKEEM_RAW: &str = "4d03444c2e0b4b8ea445a2965c907676";
    const MIKROSKEEM: &str = "4d03444c-2e0b-4b8e-a445-a2965c907676";

    #[test]
    fn test_decode_inserts_dashes() {
        let id = decode(MIKROSKEEM_RAW).unwrap();
        assert_eq!(id.to_string(), MIKROSKEEM);
    }

    #[test]
    fn test_decode_uppercase_hex() {
        let id = decode("4D03444C2E0B4B8EA445A2965C907676").unwrap();
        assert_eq!(id.to_string(), MIKROSKEEM);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert!(decode("").is_err());
        assert!(decode("4d03444c2e0b4b8ea445a2965c90767").is_err());
        assert!(decode("4d03444c2e0b4b8ea445a2965c9076760").is_err());
    }

    #[test]
    fn test_decode_rejects_dashed_form() {
        let err = decode(MIKROSKEEM).unwrap_err();
        assert_eq!(err.input, MIKROSKEEM);
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(decode("4d03444c2e0b4b8ea445a2965c90767g").is_err());
        assert!(decode("+d03444c2e0b4b8ea445a2965c907676").is_err());
    }

    #[test]
    fn test_simple_round_trips_wire_form() {
        assert_eq!(decode(MIKROSKEEM_RAW).unwrap().simple(), MIKROSKEEM_RAW);
    }

    #[test]
    fn test_from_str_accepts_both_forms() {
        let dashed: PlayerId = MIKROSKEEM.parse().unwrap();
        let simple: PlayerId = MIKROSKEEM_RAW.parse().unwrap();
        assert_eq!(dashed, simple);
    }

    #[test]
    fn test_from_str_rejects_misplaced_dashes() {
        assert!("4d03444c2-e0b-4b8e-a445-a2965c907676".parse::<PlayerId>().is_err());
        assert!("4d03444c-2e0b-4b8e-a445-a2965c90767-".parse::<PlayerId>().is_err());
    }

    #[test]
    fn test_serializes_as_dashed_string() {
        let id = decode(MIKROSKEEM_RAW).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", MIKROSKEEM));
        let back: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
