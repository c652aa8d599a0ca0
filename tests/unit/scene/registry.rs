use super::*;

#[test]
fn lookup_or_create_dedups_by_name() {
    let mut reg = ObjectRegistry::new();
    let a = reg.lookup_or_create("CameraTarget", Primitive::Empty);
    let b = reg.lookup_or_create("CameraTarget", Primitive::UvSphere { radius: 1.0 });
    assert_eq!(a, b);
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.get(a).unwrap().primitive, Primitive::Empty);
}

#[test]
fn ids_follow_creation_order() {
    let mut reg = ObjectRegistry::new();
    let a = reg.lookup_or_create("a", Primitive::Empty);
    let b = reg.lookup_or_create("b", Primitive::Empty);
    assert_eq!((a, b), (ObjectId(0), ObjectId(1)));
    let names: Vec<_> = reg.iter().map(|(_, o)| o.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(reg.by_name("b").unwrap().name, "b");
    assert_eq!(reg.id_for("missing"), None);
}

#[test]
fn clear_forgets_everything() {
    let mut reg = ObjectRegistry::new();
    reg.lookup_or_create("a", Primitive::Empty);
    reg.clear();
    assert!(reg.is_empty());
    assert_eq!(reg.id_for("a"), None);
    assert_eq!(reg.lookup_or_create("b", Primitive::Empty), ObjectId(0));
}
