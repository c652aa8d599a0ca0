use super::*;
use crate::material::graph::NodeKind;

fn built() -> (SceneContext, CelestialBodies) {
    let mut ctx = SceneContext::new();
    let bodies = CelestialBodyFactory::build(&mut ctx, &BlackHoleParams::default()).unwrap();
    (ctx, bodies)
}

fn close(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn every_body_lands_in_the_system_collection_in_order() {
    let (ctx, b) = built();
    assert_eq!(
        ctx.collection(BLACK_HOLE_COLLECTION).unwrap().objects,
        vec![
            b.event_horizon,
            b.photon_ring,
            b.disk_near,
            b.disk_far,
            b.dust,
            b.jet_north,
            b.jet_south,
            b.lensing_shell,
        ]
    );
    assert_eq!(ctx.objects().len(), 8);
}

#[test]
fn sizes_scale_with_radius() {
    let (ctx, b) = built();
    let r = 8.0;
    assert_eq!(
        ctx.object(b.event_horizon).unwrap().primitive,
        Primitive::UvSphere { radius: r }
    );
    assert_eq!(
        ctx.object(b.photon_ring).unwrap().primitive,
        Primitive::Torus {
            major_radius: 1.15 * r,
            minor_radius: 0.12 * r,
        }
    );
    let near = ctx.object(b.disk_near).unwrap();
    assert_eq!(
        near.primitive,
        Primitive::Torus {
            major_radius: 3.0 * r,
            minor_radius: 1.2 * r,
        }
    );
    assert_eq!(near.transform.scale.z, 0.1);
    assert_eq!(
        ctx.object(b.dust).unwrap().primitive,
        Primitive::UvSphere { radius: 5.0 * r }
    );
    assert_eq!(
        ctx.object(b.jet_north).unwrap().primitive,
        Primitive::Cone {
            base_radius: 0.35 * r,
            depth: 10.0 * r,
        }
    );
    assert_eq!(
        ctx.object(b.lensing_shell).unwrap().primitive,
        Primitive::UvSphere { radius: 2.4 * r }
    );
}

#[test]
fn far_disk_is_a_tilted_deformed_copy() {
    let (ctx, b) = built();
    let near = ctx.object(b.disk_near).unwrap();
    let far = ctx.object(b.disk_far).unwrap();

    assert_eq!(far.primitive, near.primitive);
    assert_eq!(far.transform.scale, near.transform.scale);
    assert!((far.transform.rotation.x - 178f64.to_radians()).abs() < 1e-12);
    assert!(close(far.transform.location, DVec3::new(0.0, 0.0, 0.45 * 8.0)));
    assert_ne!(far.material, near.material);

    let far_graph = ctx.materials().get(far.material.unwrap()).unwrap();
    assert_eq!(far_graph.name(), "BH_AccretionDisk_Far_MAT");

    let deforms: Vec<_> = far
        .modifiers
        .iter()
        .map(|m| match &m.kind {
            ModifierKind::SimpleDeform(d) => (d.method, d.axis, d.value),
            ModifierKind::CurveWrap { .. } => panic!("unexpected curve wrap"),
        })
        .collect();
    assert_eq!(
        deforms,
        vec![
            (DeformMethod::Bend, Axis::X, 165f64.to_radians()),
            (DeformMethod::Taper, Axis::Z, -0.35),
        ]
    );
    assert!(near.modifiers.is_empty());
}

#[test]
fn jets_point_away_from_the_horizon() {
    let (ctx, b) = built();
    let half = 5.0 * 8.0;
    let base = DVec3::new(0.0, 0.0, half);
    let tip = DVec3::new(0.0, 0.0, -half);

    let north = ctx.object(b.jet_north).unwrap();
    assert!(close(north.transform.location, DVec3::new(0.0, 0.0, half)));
    assert!(close(north.transform.transform_point(base), DVec3::ZERO));
    assert!(close(
        north.transform.transform_point(tip),
        DVec3::new(0.0, 0.0, 2.0 * half)
    ));

    let south = ctx.object(b.jet_south).unwrap();
    assert!(close(south.transform.location, DVec3::new(0.0, 0.0, -half)));
    assert!(close(south.transform.transform_point(base), DVec3::ZERO));
    assert!(close(
        south.transform.transform_point(tip),
        DVec3::new(0.0, 0.0, -2.0 * half)
    ));
    assert_eq!(north.material, south.material);
}

#[test]
fn lensing_shell_is_a_wire_portal() {
    let (ctx, b) = built();
    let lens = ctx.object(b.lensing_shell).unwrap();
    assert_eq!(lens.display, DisplayMode::Wire);
    assert!(lens.portal);
    let graph = ctx.materials().get(lens.material.unwrap()).unwrap();
    assert!(graph.find(|k| matches!(k, NodeKind::Fresnel { .. })).is_some());
}

#[test]
fn rebuilding_reuses_every_name() {
    let mut ctx = SceneContext::new();
    let params = BlackHoleParams::default();
    let first = CelestialBodyFactory::build(&mut ctx, &params).unwrap();
    let materials = ctx.materials().len();
    let second = CelestialBodyFactory::build(&mut ctx, &params).unwrap();

    assert_eq!(first, second);
    assert_eq!(ctx.objects().len(), 8);
    assert_eq!(ctx.materials().len(), materials);
    // the far disk copy is not stacked twice with modifiers
    assert_eq!(ctx.object(second.disk_far).unwrap().modifiers.len(), 2);
}
