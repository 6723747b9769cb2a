//! Newtype wrappers around the opaque string identifiers used throughout the
//! document. Keeping them distinct prevents accidentally comparing, say, a
//! `MatchId` against a `ParticipantId`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(RoomId, "Room/tournament slug, ASCII `[a-z0-9-]{1,64}`.");
string_id!(UserId, "Persistent per-endpoint user id, stable across reconnects.");
string_id!(PeerId, "Transient transport-level connection id.");
string_id!(ParticipantId, "Id of a participant record within a room.");
string_id!(TeamId, "Id of a team within a room (doubles mode).");
string_id!(MatchId, "Id of a match, e.g. `r1m0`, `w2m0`, `l3m1`, `gf1`, `gf2`.");
string_id!(GameId, "Id of a points-race game.");
