use amity_core::db::open_db_in_memory;
use amity_core::{
    Entity, Facility, FacilityError, FirstAvailable, PersonRepository, PersonRole, Room,
    RoomKind, RoomRepository, SqlitePersonRepository, SqliteRoomRepository,
};

fn facility() -> Facility {
    Facility::open_in_memory("amity")
        .unwrap()
        .with_selector(FirstAvailable)
}

#[test]
fn created_rooms_get_fixed_capacity_per_kind() {
    let mut amity = facility();
    amity.create_room("office", "Valhalla").unwrap();
    amity.create_room("living_space", "Python").unwrap();

    let valhalla = amity.get_room("Valhalla").unwrap();
    assert_eq!(valhalla.kind, RoomKind::Office);
    assert_eq!(valhalla.capacity, 6);

    let python = amity.get_room("Python").unwrap();
    assert_eq!(python.kind, RoomKind::LivingSpace);
    assert_eq!(python.capacity, 4);
    assert_eq!(amity.room_count().unwrap(), 2);
}

#[test]
fn duplicate_room_name_is_rejected_and_state_unchanged() {
    let mut amity = facility();
    let first = amity.create_room("office", "Valhalla").unwrap();

    let err = amity.create_room("living_space", "Valhalla").unwrap_err();
    assert!(matches!(
        err,
        FacilityError::DuplicateName {
            entity: Entity::Room,
            ref name,
        } if name == "Valhalla"
    ));
    assert_eq!(amity.room_count().unwrap(), 1);
    assert_eq!(amity.get_room("Valhalla").unwrap().id, first);
}

#[test]
fn invalid_room_type_and_blank_name_fail_before_write() {
    let mut amity = facility();

    let err = amity.create_room("kitchen", "Mess").unwrap_err();
    assert!(matches!(err, FacilityError::InvalidType(ref kind) if kind == "kitchen"));

    let err = amity.create_room("office", "   ").unwrap_err();
    assert!(matches!(err, FacilityError::InvalidName));

    assert_eq!(amity.room_count().unwrap(), 0);
}

#[test]
fn room_kind_labels_are_case_insensitive() {
    let mut amity = facility();
    amity.create_room("OFFICE", "Oculus").unwrap();
    amity.create_room("Living-Space", "Ruby").unwrap();

    assert_eq!(amity.get_room("Oculus").unwrap().kind, RoomKind::Office);
    assert_eq!(amity.get_room("Ruby").unwrap().kind, RoomKind::LivingSpace);
}

#[test]
fn create_rooms_keeps_insertion_order_and_stops_at_first_failure() {
    let mut amity = facility();
    amity
        .create_rooms("office", &["Valhalla", "Oculus", "Krypton"])
        .unwrap();

    let err = amity
        .create_rooms("office", &["Hogwarts", "Oculus", "Narnia"])
        .unwrap_err();
    assert!(matches!(err, FacilityError::DuplicateName { .. }));

    let names: Vec<String> = amity
        .list_rooms(Some(RoomKind::Office))
        .unwrap()
        .into_iter()
        .map(|room| room.name)
        .collect();
    assert_eq!(names, vec!["Valhalla", "Oculus", "Krypton", "Hogwarts"]);
}

#[test]
fn staff_are_recorded_without_accommodation() {
    let mut amity = facility();
    amity.add_person("SHERLOCK HOLMES", "staff", true).unwrap();

    let sherlock = amity.get_person("SHERLOCK HOLMES").unwrap();
    assert_eq!(sherlock.role, PersonRole::Staff);
    assert!(!sherlock.wants_accommodation);
}

#[test]
fn duplicate_person_name_is_rejected_and_state_unchanged() {
    let mut amity = facility();
    amity.create_room("office", "Valhalla").unwrap();
    amity.add_person("ADA LOVELACE", "fellow", false).unwrap();

    let err = amity.add_person("ADA LOVELACE", "staff", false).unwrap_err();
    assert!(matches!(
        err,
        FacilityError::DuplicateName {
            entity: Entity::Person,
            ..
        }
    ));
    assert_eq!(amity.people_count().unwrap(), 1);
    assert_eq!(amity.occupants_of("Valhalla").unwrap().len(), 1);
    assert_eq!(
        amity.get_person("ADA LOVELACE").unwrap().role,
        PersonRole::Fellow
    );
}

#[test]
fn invalid_role_is_rejected() {
    let mut amity = facility();
    let err = amity.add_person("ALAN TURING", "visitor", false).unwrap_err();
    assert!(matches!(err, FacilityError::InvalidRole(ref role) if role == "visitor"));
    assert_eq!(amity.people_count().unwrap(), 0);
}

#[test]
fn list_people_filters_by_role_in_registration_order() {
    let mut amity = facility();
    amity.add_person("ADA", "fellow", true).unwrap();
    amity.add_person("GRACE", "staff", false).unwrap();
    amity.add_person("LINUS", "fellow", false).unwrap();

    let fellows: Vec<String> = amity
        .list_people(Some(PersonRole::Fellow))
        .unwrap()
        .into_iter()
        .map(|person| person.name)
        .collect();
    assert_eq!(fellows, vec!["ADA", "LINUS"]);
    assert_eq!(amity.list_people(None).unwrap().len(), 3);
}

#[test]
fn unknown_names_are_not_found() {
    let amity = facility();
    assert!(matches!(
        amity.get_room("Atlantis"),
        Err(FacilityError::NotFound {
            entity: Entity::Room,
            ..
        })
    ));
    assert!(matches!(
        amity.get_person("NOBODY"),
        Err(FacilityError::NotFound {
            entity: Entity::Person,
            ..
        })
    ));
}

#[test]
fn room_repository_round_trips_by_id_and_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRoomRepository::try_new(&conn).unwrap();

    let room = Room::new(RoomKind::LivingSpace, "Python").unwrap();
    let id = repo.create_room(&room).unwrap();

    assert_eq!(repo.get_room(id).unwrap(), Some(room.clone()));
    assert_eq!(repo.find_room_by_name("Python").unwrap(), Some(room));
    assert_eq!(repo.find_room_by_name("Ruby").unwrap(), None);
    assert_eq!(repo.count_rooms().unwrap(), 1);
}

#[test]
fn person_repository_counts_and_filters() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();

    let fellow = amity_core::Person::new("ADA", PersonRole::Fellow, true).unwrap();
    let staff = amity_core::Person::new("GRACE", PersonRole::Staff, false).unwrap();
    repo.create_person(&fellow).unwrap();
    repo.create_person(&staff).unwrap();

    assert_eq!(repo.count_people().unwrap(), 2);
    assert_eq!(repo.list_people(Some(PersonRole::Staff)).unwrap(), vec![staff]);
    assert_eq!(repo.get_person(fellow.id).unwrap(), Some(fellow));
}

#[test]
fn named_facility_persists_and_can_be_dropped() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut amity = Facility::open_named(dir.path(), "amity").unwrap();
        assert_eq!(amity.name(), "amity");
        amity.create_room("office", "Valhalla").unwrap();
    }

    let amity = Facility::open_named(dir.path(), "amity").unwrap();
    assert_eq!(amity.room_count().unwrap(), 1);
    let path = amity.path().unwrap().to_path_buf();
    assert!(path.exists());

    amity.drop_db().unwrap();
    assert!(!path.exists());
}
