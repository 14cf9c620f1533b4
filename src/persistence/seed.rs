//! Sample data inserted into an empty database at startup.

/// A room to create under a seeded hotel.
#[derive(Debug, Clone, Copy)]
pub struct SeedRoom {
    /// Room number.
    pub number: &'static str,
    /// Room category.
    pub room_type: &'static str,
}

/// A hotel to create, with its rooms.
#[derive(Debug, Clone, Copy)]
pub struct SeedHotel {
    /// Hotel name.
    pub name: &'static str,
    /// Hotel location.
    pub location: &'static str,
    /// Rooms owned by this hotel.
    pub rooms: &'static [SeedRoom],
}

/// Hotels and rooms written by [`super::SqlitePersistence::seed_if_empty`].
pub const SAMPLE_HOTELS: [SeedHotel; 3] = [
    SeedHotel {
        name: "Grand Hyatt",
        location: "New York",
        rooms: &[
            SeedRoom {
                number: "101",
                room_type: "Standard",
            },
            SeedRoom {
                number: "102",
                room_type: "Suite",
            },
        ],
    },
    SeedHotel {
        name: "The Plaza",
        location: "New York",
        rooms: &[SeedRoom {
            number: "201",
            room_type: "Standard",
        }],
    },
    SeedHotel {
        name: "The Ritz-Carlton",
        location: "San Francisco",
        rooms: &[SeedRoom {
            number: "301",
            room_type: "Deluxe",
        }],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_is_three_hotels_four_rooms() {
        assert_eq!(SAMPLE_HOTELS.len(), 3);
        let rooms: usize = SAMPLE_HOTELS.iter().map(|h| h.rooms.len()).sum();
        assert_eq!(rooms, 4);
    }
}
