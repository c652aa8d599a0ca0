use super::*;
use crate::material::builder::{MaterialGraphBuilder, MaterialKind};
use crate::material::registry::MaterialRegistry;
use crate::settings::BlackHoleParams;

fn build(kind: MaterialKind, params: &BlackHoleParams) -> GraphFingerprint {
    let mut reg = MaterialRegistry::new();
    let id = MaterialGraphBuilder::build(&mut reg, "m", &kind, params).unwrap();
    fingerprint_graph(reg.get(id).unwrap())
}

#[test]
fn identical_params_give_identical_fingerprints() {
    let p = BlackHoleParams::default();
    assert_eq!(
        build(MaterialKind::AccretionDiskNear, &p),
        build(MaterialKind::AccretionDiskNear, &p)
    );
}

#[test]
fn parameter_changes_show_up() {
    let p = BlackHoleParams::default();
    let q = BlackHoleParams {
        spin: 0.2,
        ..BlackHoleParams::default()
    };
    assert_ne!(
        build(MaterialKind::PhotonRing, &p),
        build(MaterialKind::PhotonRing, &q)
    );
    assert_ne!(
        build(MaterialKind::AccretionDiskNear, &p),
        build(MaterialKind::AccretionDiskFar, &p)
    );
}

#[test]
fn name_is_not_hashed() {
    let p = BlackHoleParams::default();
    let mut reg = MaterialRegistry::new();
    let a = MaterialGraphBuilder::build(&mut reg, "a", &MaterialKind::Jet, &p).unwrap();
    let b = MaterialGraphBuilder::build(&mut reg, "b", &MaterialKind::Jet, &p).unwrap();
    assert_eq!(
        fingerprint_graph(reg.get(a).unwrap()),
        fingerprint_graph(reg.get(b).unwrap())
    );
}
