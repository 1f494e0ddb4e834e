use amity_core::{Facility, FacilityError, FirstAvailable, RoomKind};
use serde_json::json;

fn amity() -> Facility {
    let mut amity = Facility::open_in_memory("amity")
        .unwrap()
        .with_selector(FirstAvailable);
    amity.create_room("office", "Valhalla").unwrap();
    amity.create_room("living_space", "Python").unwrap();
    amity.create_room("office", "Oculus").unwrap();
    amity
}

#[test]
fn allocations_list_rooms_in_insertion_order_including_empty_ones() {
    let mut amity = amity();
    amity.add_person("ADA", "fellow", true).unwrap();
    amity.add_person("GRACE", "staff", false).unwrap();

    let allocations = amity.allocations().unwrap();
    let rooms: Vec<(&str, RoomKind, usize)> = allocations
        .iter()
        .map(|room| (room.room.as_str(), room.kind, room.occupants.len()))
        .collect();
    assert_eq!(
        rooms,
        vec![
            ("Valhalla", RoomKind::Office, 2),
            ("Python", RoomKind::LivingSpace, 1),
            ("Oculus", RoomKind::Office, 0),
        ]
    );
    assert_eq!(allocations[0].occupants, vec!["ADA", "GRACE"]);
}

#[test]
fn room_detail_reports_capacity_and_free_space() {
    let mut amity = amity();
    amity.add_person("ADA", "fellow", true).unwrap();

    let python = amity.room_detail("Python").unwrap();
    assert_eq!(python.capacity, 4);
    assert_eq!(python.available, 3);
    assert_eq!(python.occupants, vec!["ADA"]);

    assert!(matches!(
        amity.room_detail("Atlantis"),
        Err(FacilityError::NotFound { .. })
    ));
}

#[test]
fn unallocated_ignores_fellows_who_declined_accommodation() {
    let mut amity = Facility::open_in_memory("amity")
        .unwrap()
        .with_selector(FirstAvailable);
    amity.add_person("ADA", "fellow", true).unwrap();
    amity.add_person("LINUS", "fellow", false).unwrap();
    amity.add_person("GRACE", "staff", false).unwrap();

    let report = amity.unallocated().unwrap();
    assert_eq!(report.fellows_without_living_space, vec!["ADA"]);
    assert_eq!(report.people_without_office, vec!["ADA", "LINUS", "GRACE"]);
}

#[test]
fn available_rooms_report_free_space_per_room() {
    let mut amity = amity();
    amity.add_person("ADA", "fellow", true).unwrap();

    let spaces: Vec<u32> = amity
        .available_rooms()
        .unwrap()
        .into_iter()
        .map(|room| room.available_space)
        .collect();
    assert_eq!(spaces, vec![5, 3, 6]);
}

#[test]
fn reports_serialize_with_snake_case_kinds() {
    let mut amity = amity();
    amity.add_person("ADA", "fellow", true).unwrap();

    let detail = serde_json::to_value(amity.room_detail("Python").unwrap()).unwrap();
    assert_eq!(
        detail,
        json!({
            "name": "Python",
            "kind": "living_space",
            "capacity": 4,
            "available": 3,
            "occupants": ["ADA"],
        })
    );

    let unallocated = serde_json::to_value(amity.unallocated().unwrap()).unwrap();
    assert_eq!(
        unallocated,
        json!({
            "fellows_without_living_space": [],
            "people_without_office": [],
        })
    );
}
