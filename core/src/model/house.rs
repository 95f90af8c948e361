use crate::model::record::AccessPointRecord;
use crate::prelude::{ModelError, ModelResult};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($name:ident) => {
        /// Opaque identifier assigned when the entity is created or loaded.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(FloorId);
entity_id!(RoomId);

pub const UNTITLED_HOUSE: &str = "Untitled House";

/// A room and its most recent scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub id: RoomId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "scan_data", deserialize_with = "usable_records")]
    pub access_points: Vec<AccessPointRecord>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RoomId::new(),
            name: name.into(),
            access_points: Vec::new(),
        }
    }

    pub fn is_scanned(&self) -> bool {
        !self.access_points.is_empty()
    }
}

/// A floor holding rooms in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    #[serde(default)]
    pub id: FloorId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rooms: Vec<Room>,
}

impl Floor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FloorId::new(),
            name: name.into(),
            rooms: Vec::new(),
        }
    }

    /// Appends a room; a blank name becomes `Room N`.
    pub fn add_room(&mut self, name: &str) -> RoomId {
        let name = default_name(name, "Room", self.rooms.len() + 1);
        let room = Room::new(name);
        let id = room.id;
        self.rooms.push(room);
        id
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }
}

/// Root of the hierarchy. The analysis code only ever borrows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct House {
    #[serde(default, alias = "house_name")]
    pub name: String,
    pub floors: Vec<Floor>,
}

impl House {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            floors: Vec::new(),
        }
    }

    /// Builds a house from room names grouped per floor.
    pub fn with_layout<L, F, S>(name: impl Into<String>, layout: L) -> Self
    where
        L: IntoIterator<Item = F>,
        F: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut house = Self::new(name);
        for rooms in layout {
            let floor_id = house.add_floor("");
            if let Some(floor) = house.floor_mut(floor_id) {
                for room in rooms {
                    floor.add_room(room.as_ref());
                }
            }
        }
        house
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            UNTITLED_HOUSE
        } else {
            &self.name
        }
    }

    /// Appends a floor; a blank name becomes `Floor N`.
    pub fn add_floor(&mut self, name: &str) -> FloorId {
        let floor = Floor::new(default_name(name, "Floor", self.floors.len() + 1));
        let id = floor.id;
        self.floors.push(floor);
        id
    }

    pub fn add_room(&mut self, floor: FloorId, name: &str) -> ModelResult<RoomId> {
        self.floor_mut(floor)
            .map(|f| f.add_room(name))
            .ok_or_else(|| ModelError::UnknownFloor(floor.to_string()))
    }

    pub fn floor(&self, id: FloorId) -> Option<&Floor> {
        self.floors.iter().find(|floor| floor.id == id)
    }

    fn floor_mut(&mut self, id: FloorId) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|floor| floor.id == id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.floors.iter().find_map(|floor| floor.room(id))
    }

    /// Every room paired with its floor, in display order.
    pub fn rooms(&self) -> impl Iterator<Item = (&Floor, &Room)> + '_ {
        self.floors
            .iter()
            .flat_map(|floor| floor.rooms.iter().map(move |room| (floor, room)))
    }

    /// Replaces the room's access-point list with a fresh scan.
    pub fn record_scan(
        &mut self,
        room: RoomId,
        records: Vec<AccessPointRecord>,
    ) -> ModelResult<usize> {
        let target = self
            .floors
            .iter_mut()
            .flat_map(|floor| floor.rooms.iter_mut())
            .find(|r| r.id == room)
            .ok_or_else(|| ModelError::UnknownRoom(room.to_string()))?;
        target.access_points = records;
        Ok(target.access_points.len())
    }

    /// Gives blank floors and rooms their positional default names.
    pub(crate) fn fill_default_names(&mut self) {
        for (floor_idx, floor) in self.floors.iter_mut().enumerate() {
            floor.name = default_name(&floor.name, "Floor", floor_idx + 1);
            for (room_idx, room) in floor.rooms.iter_mut().enumerate() {
                room.name = default_name(&room.name, "Room", room_idx + 1);
            }
        }
    }
}

fn default_name(name: &str, prefix: &str, position: usize) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        format!("{} {}", prefix, position)
    } else {
        trimmed.to_string()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps the rows that look like access points; anything else is dropped.
fn usable_records<'de, D>(deserializer: D) -> Result<Vec<AccessPointRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Vec<Value> = null_as_empty(deserializer)?;
    let total = rows.len();
    let records: Vec<AccessPointRecord> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();
    if records.len() < total {
        warn!("dropped {} malformed scan rows", total - records.len());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_assigns_default_names() {
        let house = House::with_layout("", vec![vec!["Kitchen", " "], vec![""]]);
        assert_eq!(house.display_name(), UNTITLED_HOUSE);
        assert_eq!(house.floors.len(), 2);
        assert_eq!(house.floors[0].name, "Floor 1");
        assert_eq!(house.floors[0].rooms[0].name, "Kitchen");
        assert_eq!(house.floors[0].rooms[1].name, "Room 2");
        assert_eq!(house.floors[1].name, "Floor 2");
        assert_eq!(house.floors[1].rooms[0].name, "Room 1");
    }

    #[test]
    fn record_scan_replaces_previous_scan() {
        let mut house = House::with_layout("Home", vec![vec!["Office"]]);
        let room = house.floors[0].rooms[0].id;

        let first = vec![
            AccessPointRecord::new().with_channel(1),
            AccessPointRecord::new().with_channel(6),
        ];
        assert_eq!(house.record_scan(room, first).unwrap(), 2);

        let second = vec![AccessPointRecord::new().with_channel(11)];
        assert_eq!(house.record_scan(room, second).unwrap(), 1);

        let stored = &house.room(room).unwrap().access_points;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].channel_number(), Some(11));
    }

    #[test]
    fn unknown_identifiers_are_rejected() {
        let mut house = House::new("Home");
        assert!(matches!(
            house.record_scan(RoomId::new(), Vec::new()),
            Err(ModelError::UnknownRoom(_))
        ));
        assert!(matches!(
            house.add_room(FloorId::new(), "Den"),
            Err(ModelError::UnknownFloor(_))
        ));
    }

    #[test]
    fn identifiers_survive_reordering() {
        let mut house = House::with_layout("Home", vec![vec!["A", "B"]]);
        let b = house.floors[0].rooms[1].id;
        house.floors[0].rooms.swap(0, 1);
        assert_eq!(house.room(b).unwrap().name, "B");
    }

    #[test]
    fn rooms_iterate_in_floor_order() {
        let house = House::with_layout("Home", vec![vec!["A", "B"], vec!["C"]]);
        let names: Vec<_> = house.rooms().map(|(_, room)| room.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
