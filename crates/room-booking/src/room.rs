//! Rooms are static reference data: seeded once, never mutated.

use serde::{Deserialize, Serialize};

/// A bookable meeting room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    /// Advisory lower bound, used for filtering and suggestions only.
    pub capacity_min: u32,
    /// Hard upper bound enforced when booking.
    pub capacity_max: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Room {
    pub fn new(id: &str, name: &str, capacity_min: u32, capacity_max: u32, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            capacity_min,
            capacity_max,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn fits(&self, people: u32) -> bool {
        people <= self.capacity_max
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Ordered, read-only set of rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCatalog {
    rooms: Vec<Room>,
}

impl RoomCatalog {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// The six rooms every office starts with.
    pub fn default_rooms() -> Self {
        Self::new(vec![
            Room::new("room-1", "Focus Pod", 1, 2, &["Small", "Quiet"]),
            Room::new("room-2", "Duo Room", 2, 3, &["Small"]),
            Room::new("room-3", "Collaboration Suite", 4, 6, &["Medium", "Whiteboard"]),
            Room::new("room-4", "Strategy Room", 5, 8, &["Medium", "Screen"]),
            Room::new("room-5", "Boardroom", 8, 12, &["Large", "AV System"]),
            Room::new("room-6", "Town Hall", 10, 20, &["Large", "Stage"]),
        ])
    }

    pub fn list_rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn get_room_by_id(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Rooms matching a people-count filter, in catalog order.
    pub fn filter_by_people(&self, filter: PeopleFilter) -> Vec<&Room> {
        self.rooms.iter().filter(|r| filter.matches(r)).collect()
    }
}

/// Preset people-count ranges for narrowing the room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeopleFilter {
    #[default]
    Any,
    OneToTwo,
    ThreeToFour,
    FiveToEight,
    NinePlus,
}

impl PeopleFilter {
    pub const ALL: [PeopleFilter; 5] = [
        PeopleFilter::Any,
        PeopleFilter::OneToTwo,
        PeopleFilter::ThreeToFour,
        PeopleFilter::FiveToEight,
        PeopleFilter::NinePlus,
    ];

    /// Inclusive `(min, max)` bounds; `None` for [`PeopleFilter::Any`].
    pub fn bounds(self) -> Option<(u32, u32)> {
        match self {
            PeopleFilter::Any => None,
            PeopleFilter::OneToTwo => Some((1, 2)),
            PeopleFilter::ThreeToFour => Some((3, 4)),
            PeopleFilter::FiveToEight => Some((5, 8)),
            PeopleFilter::NinePlus => Some((9, 100)),
        }
    }

    /// Pick the preset range that contains `people`.
    pub fn for_people(people: u32) -> Self {
        Self::ALL
            .into_iter()
            .skip(1)
            .find(|f| f.bounds().is_some_and(|(lo, hi)| (lo..=hi).contains(&people)))
            .unwrap_or(PeopleFilter::Any)
    }

    /// A room matches when its capacity range intersects the filter range.
    pub fn matches(self, room: &Room) -> bool {
        match self.bounds() {
            None => true,
            Some((min, max)) => room.capacity_max >= min && room.capacity_min <= max,
        }
    }
}
