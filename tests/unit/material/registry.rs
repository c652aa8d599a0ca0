use super::*;

#[test]
fn lookup_or_create_returns_existing_entry() {
    let mut reg = MaterialRegistry::new();
    let a = reg.lookup_or_create("BH_EventHorizon_MAT", GraphDomain::Object);
    let b = reg.lookup_or_create("BH_PhotonRing_MAT", GraphDomain::Object);
    let again = reg.lookup_or_create("BH_EventHorizon_MAT", GraphDomain::Object);

    assert_eq!(a, again);
    assert_ne!(a, b);
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.id_for("BH_PhotonRing_MAT"), Some(b));
    assert_eq!(reg.get(a).unwrap().name(), "BH_EventHorizon_MAT");
    assert!(reg.by_name("missing").is_none());
}

#[test]
fn clear_forgets_everything() {
    let mut reg = MaterialRegistry::new();
    reg.lookup_or_create("a", GraphDomain::Object);
    reg.clear();
    assert!(reg.is_empty());
    assert_eq!(reg.id_for("a"), None);
    assert_eq!(reg.lookup_or_create("b", GraphDomain::World), MaterialId(0));
}
