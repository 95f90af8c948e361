use crate::model::{AccessPointRecord, Floor};

/// Concatenates every room's scan in room order, keeping within-room order.
pub fn flatten_floor(floor: &Floor) -> Vec<AccessPointRecord> {
    floor
        .rooms
        .iter()
        .flat_map(|room| room.access_points.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ap(bssid: &str) -> AccessPointRecord {
        AccessPointRecord::new().with_bssid(bssid)
    }

    #[test]
    fn empty_floor_flattens_to_nothing() {
        let mut floor = Floor::new("Attic");
        assert!(flatten_floor(&floor).is_empty());

        floor.add_room("Storage");
        floor.add_room("");
        assert!(flatten_floor(&floor).is_empty());
    }

    #[test]
    fn rooms_are_concatenated_in_order() {
        let mut floor = Floor::new("Ground");
        floor.add_room("Kitchen");
        floor.add_room("Hall");
        floor.add_room("Den");
        floor.rooms[0].access_points = vec![ap("01"), ap("02")];
        floor.rooms[2].access_points = vec![ap("03")];

        let flat: Vec<_> = flatten_floor(&floor)
            .into_iter()
            .filter_map(|r| r.bssid)
            .collect();
        assert_eq!(flat, vec!["01", "02", "03"]);
    }
}
