use classroom_macros::value_object;

#[value_object]
struct Seats {
    value: u32,
}

#[value_object(default = false)]
struct Room(String);

#[value_object]
enum Shift {
    #[default]
    Morning,
    Evening,
}

fn main() {
    let a = Seats::default();
    let _b = a.clone();
    assert!(a == Seats { value: 0 });
    let _ = format!("{:?}", a);

    // default = false 时只要求可构造
    let _ = Room("B-201".to_string());

    let shift: Shift = Default::default();
    assert_eq!(shift, Shift::Morning);
    assert_eq!(serde_json::to_string(&Shift::Evening).unwrap(), "\"Evening\"");
}
