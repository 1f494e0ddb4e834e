use amity_core::{Facility, FacilityError, FirstAvailable, PersonRole, RoomKind};
use std::io::Write;

const PEOPLE: &str = "\
OLUWAFEMI SULE FELLOW Y
DOMINIC WALTERS STAFF
SIMON PATTERSON FELLOW Y
MARI LAWRENCE FELLOW Y
LEIGH RILEY STAFF
TANA LOPEZ FELLOW Y
KELLY McGUIRE STAFF N
";

fn amity() -> Facility {
    let mut amity = Facility::open_in_memory("amity")
        .unwrap()
        .with_selector(FirstAvailable);
    amity.create_room("office", "Valhalla").unwrap();
    amity.create_room("office", "Oculus").unwrap();
    amity.create_room("living_space", "Python").unwrap();
    amity
}

#[test]
fn loads_every_record_and_allocates_rooms() {
    let mut amity = amity();
    let report = amity.load_batch(PEOPLE.lines()).unwrap();

    assert_eq!(report.added.len(), 7);
    assert!(report.skipped.is_empty());
    assert_eq!(amity.people_count().unwrap(), 7);
    assert_eq!(amity.occupants_of("Valhalla").unwrap().len(), 6);
    assert_eq!(amity.occupants_of("Oculus").unwrap().len(), 1);
    assert_eq!(amity.occupants_of("Python").unwrap().len(), 4);

    let kelly = amity.get_person("KELLY McGUIRE").unwrap();
    assert_eq!(kelly.role, PersonRole::Staff);
    assert!(!kelly.wants_accommodation);
}

#[test]
fn rerunning_the_same_file_skips_known_names_with_line_numbers() {
    let mut amity = amity();
    amity.load_batch(PEOPLE.lines()).unwrap();

    let report = amity.load_batch(PEOPLE.lines()).unwrap();
    assert!(report.added.is_empty());
    assert_eq!(report.skipped.len(), 7);
    assert_eq!(report.skipped[0].line, 1);
    assert_eq!(report.skipped[0].name, "OLUWAFEMI SULE");
    assert_eq!(report.skipped[6].line, 7);
    assert_eq!(amity.people_count().unwrap(), 7);
}

#[test]
fn blank_lines_are_ignored_but_still_counted() {
    let mut amity = amity();
    amity.add_person("LEIGH RILEY", "staff", false).unwrap();

    let report = amity
        .load_batch(["ADA FELLOW N", "", "   ", "LEIGH RILEY STAFF"])
        .unwrap();
    assert_eq!(report.added.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 4);
}

#[test]
fn malformed_line_aborts_and_keeps_earlier_lines() {
    let mut amity = amity();
    let lines = [
        "ADA LOVELACE FELLOW Y",
        "GRACE HOPPER ENGINEER",
        "LINUS TORVALDS STAFF",
    ];

    let err = amity.load_batch(lines).unwrap_err();
    match err {
        FacilityError::InvalidRecord { line, content } => {
            assert_eq!(line, 2);
            assert_eq!(content, "GRACE HOPPER ENGINEER");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(amity.people_count().unwrap(), 1);
    let ada_rooms = amity.rooms_of("ADA LOVELACE").unwrap();
    assert_eq!(ada_rooms.len(), 2);
    assert!(amity.get_person("LINUS TORVALDS").is_err());
}

#[test]
fn load_people_reads_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(PEOPLE.as_bytes()).unwrap();
    drop(file);

    let mut amity = amity();
    let report = amity.load_people(&path).unwrap();
    assert_eq!(report.added.len(), 7);

    let first = &report.added[0];
    assert_eq!(first.name, "OLUWAFEMI SULE");
    assert_eq!(first.room_for(RoomKind::Office), Some("Valhalla"));
    assert_eq!(first.room_for(RoomKind::LivingSpace), Some("Python"));
}

#[test]
fn missing_people_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut amity = amity();

    let err = amity.load_people(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, FacilityError::Io { .. }));
    assert_eq!(amity.people_count().unwrap(), 0);
}
