use classroom_macros::entity_id;
use std::str::FromStr;

#[entity_id(copy = true)]
struct SeatId(u64);

#[entity_id]
struct Slug(String);

fn main() {
    let id = SeatId::new(7);
    let copied = id; // Copy 开启，原值仍可使用
    assert_eq!(id, copied);
    assert_eq!(id.to_string(), "7");
    assert_eq!(SeatId::from_str("7").unwrap(), id);
    assert_eq!(u64::from(id), 7);

    // serde(transparent)：序列化为裸值
    assert_eq!(serde_json::to_string(&id).unwrap(), "7");

    let slug = Slug::new("physics".to_string());
    let _ = format!("{:?}", slug.clone());
    assert_eq!(slug.as_ref(), "physics");
    assert_eq!(slug.into_inner(), "physics");
}
