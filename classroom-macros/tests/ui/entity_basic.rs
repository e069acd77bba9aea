use classroom_domain::entity::Entity;
use classroom_domain::value_object::Version;
use classroom_macros::{entity, entity_id};

#[entity_id(copy = true)]
struct DeskId(u64);

#[entity(id = DeskId)]
struct Desk {
    label: String,
}

#[entity(id = DeskId, debug = false)]
struct Locker {
    code: u32,
}

impl std::fmt::Debug for Locker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Locker(..)")
    }
}

fn main() {
    let desk = <Desk as Entity>::new(DeskId::new(1), Version::new());
    assert_eq!(desk.id(), &DeskId::new(1));
    assert!(desk.version().is_new());
    assert!(desk.label.is_empty());
    let _ = format!("{:?}", desk);

    let locker = Locker::default();
    assert_eq!(locker.code, 0);
    let _ = format!("{:?}", locker);

    let json = serde_json::to_value(&desk).unwrap();
    assert_eq!(json["id"], 1);
}
