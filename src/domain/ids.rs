//! Type-safe entity identifiers.
//!
//! Hotels, rooms and bookings are keyed by SQLite surrogate integer ids.
//! Each kind gets its own newtype so a room id can never be passed where a
//! booking id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw row id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a row in the `hotel` table.
    HotelId
);

entity_id!(
    /// Identifier of a row in the `room` table.
    RoomId
);

entity_id!(
    /// Identifier of a row in the `booking` table.
    BookingId
);

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_integer() {
        assert_eq!(HotelId::new(42).to_string(), "42");
        assert_eq!(BookingId::new(-1).to_string(), "-1");
    }

    #[test]
    fn parses_from_form_text() {
        let Ok(id) = "  101 ".parse::<RoomId>() else {
            panic!("valid room id");
        };
        assert_eq!(id.get(), 101);
        assert!("abc".parse::<RoomId>().is_err());
        assert!("".parse::<RoomId>().is_err());
    }

    #[test]
    fn serde_is_transparent() {
        let Ok(json) = serde_json::to_string(&BookingId::new(7)) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "7");
        let Ok(back) = serde_json::from_str::<BookingId>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(back, BookingId::new(7));
    }

    #[test]
    fn converts_to_and_from_i64() {
        let id = HotelId::from(3);
        let raw: i64 = id.into();
        assert_eq!(raw, 3);
    }
}
