//! JSON house documents.
//!
//! The on-disk layout is owned by whoever persists the house; this module only
//! checks the structure the analysis code relies on.

use crate::model::house::House;
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("malformed house document: {0}")]
    Malformed(String),
    #[error("house document has no floors list")]
    MissingFloors,
    #[error("failed to serialize house: {0}")]
    Serialize(String),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Parses a house document, rejecting anything without a `floors` array.
pub fn from_json(contents: &str) -> DocumentResult<House> {
    let value: Value =
        serde_json::from_str(contents).map_err(|e| DocumentError::Malformed(e.to_string()))?;
    from_value(value)
}

pub fn from_value(value: Value) -> DocumentResult<House> {
    let object = value
        .as_object()
        .ok_or_else(|| DocumentError::Malformed("expected a JSON object".into()))?;
    match object.get("floors") {
        Some(Value::Array(_)) => {}
        Some(_) => return Err(DocumentError::Malformed("floors must be a list".into())),
        None => return Err(DocumentError::MissingFloors),
    }

    let mut house: House =
        serde_json::from_value(value).map_err(|e| DocumentError::Malformed(e.to_string()))?;
    house.fill_default_names();
    Ok(house)
}

pub fn to_json(house: &House) -> DocumentResult<String> {
    serde_json::to_string_pretty(house).map_err(|e| DocumentError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::AccessPointRecord;

    #[test]
    fn document_without_floors_is_rejected() {
        let err = from_json(r#"{"house_name": "Home"}"#).unwrap_err();
        assert!(matches!(err, DocumentError::MissingFloors));

        let err = from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));

        let err = from_json(r#"{"floors": 3}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }

    #[test]
    fn legacy_keys_are_accepted() {
        let house = from_json(
            r#"{
                "house_name": "Cottage",
                "floors": [
                    {"name": "Ground", "rooms": [
                        {"name": "Kitchen", "scan_data": [
                            {"ssid": "Home", "bssid": "AA:BB:CC:DD:EE:FF", "channel": 6}
                        ]},
                        {"name": "", "scan_data": null}
                    ]},
                    {"rooms": []}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(house.display_name(), "Cottage");
        assert_eq!(house.floors[0].rooms[0].access_points.len(), 1);
        assert_eq!(house.floors[0].rooms[1].name, "Room 2");
        assert!(house.floors[0].rooms[1].access_points.is_empty());
        assert_eq!(house.floors[1].name, "Floor 2");
    }

    #[test]
    fn malformed_scan_rows_do_not_sink_the_house() {
        let house = from_json(
            r#"{
                "house_name": "Cottage",
                "floors": [
                    {"name": "Ground", "rooms": [
                        {"name": "Kitchen", "access_points": [
                            {"ssid": 42, "bssid": ["x"], "channel": 11},
                            {"ssid": "Home", "bssid": "aa:bb:cc:dd:ee:ff", "channel": 6}
                        ]},
                        {"name": "Hall", "scan_data": ["garbage", null, 7, {"channel": "1"}]}
                    ]},
                    {"name": "Loft", "rooms": [{"name": "Attic"}]}
                ]
            }"#,
        )
        .unwrap();

        let kitchen = &house.floors[0].rooms[0].access_points;
        assert_eq!(kitchen.len(), 2);
        assert_eq!(kitchen[0].ssid, None);
        assert_eq!(kitchen[0].bssid, None);
        assert_eq!(kitchen[0].channel_number(), Some(11));
        assert_eq!(kitchen[1].ssid.as_deref(), Some("Home"));

        let hall = &house.floors[0].rooms[1].access_points;
        assert_eq!(hall.len(), 1);
        assert_eq!(hall[0].channel_number(), Some(1));

        assert_eq!(house.floors[1].rooms[0].name, "Attic");
    }

    #[test]
    fn saved_document_loads_back_with_same_identifiers() {
        let mut house = House::with_layout("Home", vec![vec!["Office"]]);
        let room = house.floors[0].rooms[0].id;
        house
            .record_scan(
                room,
                vec![AccessPointRecord::new()
                    .with_bssid("aa:bb:cc:dd:ee:ff")
                    .with_channel(11)],
            )
            .unwrap();

        let loaded = from_json(&to_json(&house).unwrap()).unwrap();
        assert_eq!(loaded, house);
    }
}
