use super::*;

fn params() -> BlackHoleParams {
    BlackHoleParams {
        spin: 0.7,
        disk_intensity: 6.0,
        ..BlackHoleParams::default()
    }
}

fn built(kind: MaterialKind, p: &BlackHoleParams) -> MaterialGraph {
    let mut reg = MaterialRegistry::new();
    let id = MaterialGraphBuilder::build(&mut reg, "m", &kind, p).unwrap();
    reg.get(id).unwrap().clone()
}

fn emission_strengths(g: &MaterialGraph) -> Vec<f64> {
    g.nodes()
        .iter()
        .filter_map(|n| match n.kind {
            NodeKind::Emission { strength, .. } => Some(strength),
            _ => None,
        })
        .collect()
}

/// Follow `from.socket` through scalar math nodes into a color ramp and return the ramp input
/// for an upstream value of `x`.
fn ramp_input(g: &MaterialGraph, from: NodeId, socket: &str, x: f64) -> f64 {
    let (mut node, mut socket, mut x) = (from, socket.to_string(), x);
    loop {
        let link = g
            .links()
            .iter()
            .find(|l| l.from == node && l.from_socket == socket)
            .expect("chain ends before a color ramp");
        match g.node(link.to).unwrap().kind {
            NodeKind::Math { op, b, .. } => {
                assert_eq!(link.to_socket, "A");
                x = match op {
                    MathOp::Add => x + b,
                    MathOp::Subtract => x - b,
                    MathOp::Multiply => x * b,
                };
                node = link.to;
                socket = "Value".to_string();
            }
            NodeKind::ColorRamp { .. } => return x,
            ref other => panic!("unexpected node in ramp chain: {other:?}"),
        }
    }
}

fn noise_params(g: &MaterialGraph) -> (f64, f64, f64) {
    match g
        .find(|k| matches!(k, NodeKind::NoiseTexture { .. }))
        .map(|n| &n.kind)
    {
        Some(NodeKind::NoiseTexture {
            scale,
            detail,
            roughness,
        }) => (*scale, *detail, *roughness),
        _ => panic!("graph has no noise node"),
    }
}

fn mapping_rotation_z(g: &MaterialGraph) -> f64 {
    match g
        .find(|k| matches!(k, NodeKind::Mapping { .. }))
        .map(|n| &n.kind)
    {
        Some(NodeKind::Mapping { rotation, .. }) => rotation.z,
        _ => panic!("graph has no mapping node"),
    }
}

#[test]
fn every_kind_builds_a_valid_graph() {
    let p = params();
    for kind in [
        MaterialKind::EventHorizon,
        MaterialKind::PhotonRing,
        MaterialKind::AccretionDiskNear,
        MaterialKind::AccretionDiskFar,
        MaterialKind::DustVolume,
        MaterialKind::Jet,
        MaterialKind::LensingShell,
        MaterialKind::Placeholder {
            color: Rgba::rgb(0.1, 0.2, 0.3),
        },
        MaterialKind::ImagePlane {
            path: PathBuf::from("a.png"),
        },
        MaterialKind::WorldBackground,
    ] {
        let g = built(kind.clone(), &p);
        g.validate().unwrap();
        assert_eq!(g.domain(), kind.domain());
    }
}

#[test]
fn event_horizon_adds_core_and_rim() {
    let g = built(MaterialKind::EventHorizon, &params());
    assert_eq!(emission_strengths(&g), vec![0.02, 1.2]);
    assert!(g.find(|k| matches!(k, NodeKind::LayerWeight { .. })).is_some());
    let out = g.output().unwrap();
    let feed = g.incoming(out).next().unwrap();
    assert!(matches!(
        g.node(feed.from).unwrap().kind,
        NodeKind::AddShader
    ));
}

#[test]
fn photon_ring_matches_visual_contract() {
    let p = params();
    let g = built(MaterialKind::PhotonRing, &p);
    assert_eq!(emission_strengths(&g), vec![65.0]);
    assert_eq!(noise_params(&g), (45.0, 0.25, 0.6));
    assert!((mapping_rotation_z(&g) - 0.7 * 7.5).abs() < 1e-12);
    assert!(g.find(|k| matches!(
        k,
        NodeKind::MixRgb { blend: BlendType::Multiply, factor, .. } if *factor == 0.65
    ))
    .is_some());

    let stops = g
        .nodes()
        .iter()
        .find_map(|n| match &n.kind {
            NodeKind::ColorRamp {
                interpolation: RampInterpolation::Ease,
                stops,
            } => Some(stops.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0].color, Rgba::from_rgb(p.disk_color));
    assert_eq!(stops[1].color, Rgba::WHITE);
}

#[test]
fn near_disk_matches_visual_contract() {
    let p = params();
    let g = built(MaterialKind::AccretionDiskNear, &p);
    assert_eq!(emission_strengths(&g), vec![6.0]);
    let (scale, detail, roughness) = noise_params(&g);
    assert_eq!((scale, roughness), (55.0, 0.45));
    assert!((detail - 1.25 * 0.7).abs() < 1e-12);
    assert!((mapping_rotation_z(&g) - 0.7 * 1.5).abs() < 1e-12);
    assert!(g.find(|k| matches!(
        k,
        NodeKind::Mapping { scale, .. } if *scale == DVec3::new(1.0, 0.18, 1.0)
    ))
    .is_some());
    assert!(g.find(|k| matches!(
        k,
        NodeKind::GradientTexture { gradient: GradientType::Radial }
    ))
    .is_some());
    assert!(g.find(|k| matches!(
        k,
        NodeKind::ColorRamp { stops, .. } if stops.len() == 5
    ))
    .is_some());
    assert!(g.find(|k| matches!(
        k,
        NodeKind::MixRgb { blend: BlendType::Overlay, factor, .. } if *factor == 0.65
    ))
    .is_some());
    assert!(g.find(|k| matches!(
        k,
        NodeKind::MixRgb { blend: BlendType::Add, factor, .. } if *factor == 0.4
    ))
    .is_some());
}

#[test]
fn disk_noise_detail_has_a_floor() {
    let p = BlackHoleParams {
        spin: 0.0,
        ..params()
    };
    let g = built(MaterialKind::AccretionDiskNear, &p);
    assert!((noise_params(&g).1 - 0.125).abs() < 1e-12);
}

#[test]
fn far_disk_is_dimmer_copy_of_near_disk() {
    let p = params();
    let near = built(MaterialKind::AccretionDiskNear, &p);
    let far = built(MaterialKind::AccretionDiskFar, &p);
    assert_eq!(near.nodes().len(), far.nodes().len());
    assert_eq!(near.links(), far.links());
    assert!((emission_strengths(&far)[0] - 6.0 * 0.65).abs() < 1e-12);
}

#[test]
fn dust_density_weights() {
    let g = built(MaterialKind::DustVolume, &params());
    let weights: Vec<(MathOp, f64)> = g
        .nodes()
        .iter()
        .filter_map(|n| match n.kind {
            NodeKind::Math { op, b, .. } => Some((op, b)),
            _ => None,
        })
        .collect();
    assert_eq!(
        weights,
        vec![
            (MathOp::Multiply, 1.0 / 40.0),
            (MathOp::Multiply, 0.7),
            (MathOp::Multiply, 0.3),
            (MathOp::Add, 0.0),
            (MathOp::Multiply, 0.45),
        ]
    );
    assert_eq!(noise_params(&g), (9.0, 2.2, 0.65));
    assert!(g.find(|k| matches!(
        k,
        NodeKind::PrincipledVolume { anisotropy, .. } if *anisotropy == 0.35
    ))
    .is_some());
    let out = g.output().unwrap();
    assert_eq!(g.incoming(out).next().unwrap().to_socket, "Volume");
}

#[test]
fn jet_ramps_blue_to_white() {
    let g = built(MaterialKind::Jet, &params());
    assert_eq!(emission_strengths(&g), vec![28.0]);
    assert_eq!(noise_params(&g), (15.0, 3.0, 0.4));
    let stops = g
        .nodes()
        .iter()
        .find_map(|n| match &n.kind {
            NodeKind::ColorRamp { stops, .. } => Some(stops.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(stops[0].color, Rgba::rgb(0.1, 0.3, 0.9));
    assert_eq!(stops[1].color, Rgba::WHITE);
    assert!(g.find(|k| matches!(
        k,
        NodeKind::MixRgb { blend: BlendType::Multiply, factor, .. } if *factor == 0.5
    ))
    .is_some());
}

#[test]
fn jet_ramp_input_spans_base_to_tip() {
    for radius in [1.0, 8.0, 20.0] {
        let p = BlackHoleParams {
            radius,
            ..params()
        };
        let g = built(MaterialKind::Jet, &p);
        let split = g.find(|k| matches!(k, NodeKind::SeparateXyz)).unwrap().id;
        let half = radius * JET_DEPTH_FACTOR * 0.5;

        assert!(ramp_input(&g, split, "Z", half).abs() < 1e-12);
        assert!((ramp_input(&g, split, "Z", 0.0) - 0.5).abs() < 1e-12);
        assert!((ramp_input(&g, split, "Z", -half) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn dust_radial_falloff_spans_the_envelope() {
    let p = params();
    let g = built(MaterialKind::DustVolume, &p);
    let distance = g
        .find(|k| matches!(k, NodeKind::VectorMath { .. }))
        .unwrap()
        .id;
    let envelope = p.radius * DUST_RADIUS_FACTOR;

    assert_eq!(ramp_input(&g, distance, "Value", 0.0), 0.0);
    assert!((ramp_input(&g, distance, "Value", envelope) - 1.0).abs() < 1e-12);
    // Just outside the horizon the falloff is still well short of the 0.7 cut-off.
    let at_horizon = ramp_input(&g, distance, "Value", p.radius);
    assert!(at_horizon > 0.0 && at_horizon < 0.7);
}

#[test]
fn lensing_shell_mixes_by_fresnel() {
    let g = built(MaterialKind::LensingShell, &params());
    assert!(g.find(|k| matches!(k, NodeKind::Fresnel { ior } if *ior == 1.45)).is_some());
    assert!(g.find(|k| matches!(k, NodeKind::TransparentBsdf)).is_some());
    assert!(g.find(|k| matches!(k, NodeKind::MixShader { .. })).is_some());
}

#[test]
fn world_has_sparse_star_field() {
    let g = built(MaterialKind::WorldBackground, &params());
    assert_eq!(g.domain(), GraphDomain::World);
    assert!(g.find(|k| matches!(
        k,
        NodeKind::VoronoiTexture { feature: VoronoiFeature::SmoothF1, scale } if *scale == 180.0
    ))
    .is_some());
    assert!(g.find(|k| matches!(
        k,
        NodeKind::ColorRamp { stops, .. }
            if stops.len() == 2 && stops[0].position == 0.96 && stops[1].position == 1.0
    ))
    .is_some());
}

#[test]
fn rebuild_replaces_graph_in_place() {
    let mut reg = MaterialRegistry::new();
    let p = params();
    let a = MaterialGraphBuilder::build(&mut reg, "m", &MaterialKind::Jet, &p).unwrap();
    let first = reg.get(a).unwrap().clone();
    let b = MaterialGraphBuilder::build(&mut reg, "m", &MaterialKind::Jet, &p).unwrap();
    assert_eq!(a, b);
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.get(b).unwrap(), &first);

    let c = MaterialGraphBuilder::build(&mut reg, "m", &MaterialKind::LensingShell, &p).unwrap();
    assert_eq!(a, c);
    assert_eq!(reg.len(), 1);
    assert!(reg.get(c).unwrap().find(|k| matches!(k, NodeKind::Fresnel { .. })).is_some());
}

#[test]
fn placeholder_uses_given_color() {
    let color = Rgba::rgb(0.25, 0.5, 0.75);
    let g = built(MaterialKind::Placeholder { color }, &params());
    assert!(g.find(|k| matches!(
        k,
        NodeKind::Emission { color: c, strength } if *c == color && *strength == 3.0
    ))
    .is_some());
}
