use super::*;
use crate::foundation::core::FrameIndex;

fn frames(start: i64, end: i64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

fn rig(params: &CameraParams) -> (SceneContext, CameraRig) {
    let mut ctx = SceneContext::new();
    let rig = CameraOrbitAnimator::build(&mut ctx, params, 8.0, frames(1, 450)).unwrap();
    (ctx, rig)
}

#[test]
fn offset_channel_spans_the_render_window() {
    let (ctx, rig) = rig(&CameraParams::default());
    let ch = rig.offset_channel(&ctx).unwrap();
    let keys: Vec<_> = ch.keys().iter().map(|k| (k.frame, k.value)).collect();
    assert_eq!(keys, vec![(FrameIndex(1), 0.0), (FrameIndex(450), 1.0)]);
    assert_eq!(ch.evaluate(FrameIndex(0)).unwrap(), 0.0);
    assert_eq!(ch.evaluate(FrameIndex(500)).unwrap(), 1.0);
}

#[test]
fn orbit_is_a_tilted_circle() {
    let (ctx, rig) = rig(&CameraParams::default());
    let path = ctx.object(rig.orbit_path).unwrap();
    let curve = path.primitive.as_curve().unwrap();
    assert_eq!(curve.shape, crate::scene::curve::CurveShape::Circle { radius: 48.0 });
    assert_eq!(curve.resolution, 64);
    assert_eq!(curve.path_duration, 360);
    assert_eq!(path.transform.rotation, euler_degrees(38.0, 0.0, 42.0));
}

#[test]
fn camera_tracks_and_focuses_on_the_target() {
    let (ctx, rig) = rig(&CameraParams::default());
    let cam = ctx.object(rig.camera).unwrap();
    assert_eq!(ctx.active_camera(), Some(rig.camera));
    assert_eq!(cam.transform.location, DVec3::new(0.0, 0.0, 12.0));

    let lens = cam.camera().unwrap();
    assert_eq!(lens.focal_length, 55.0);
    let dof = lens.dof.as_ref().unwrap();
    assert_eq!(dof.focus_object, Some(rig.track_target));
    assert_eq!(dof.aperture_fstop, 2.2);

    let track = cam.track_to().unwrap();
    assert_eq!(
        (track.target, track.track, track.up),
        (rig.track_target, Axis::NegZ, Axis::Y)
    );
    let follow = cam.follow_path(rig.follow_path).unwrap();
    assert_eq!(follow.target, rig.orbit_path);
    assert!(follow.fixed_location);
    assert_eq!((follow.forward, follow.up), (Axis::Y, Axis::Z));

    let target = ctx.object(rig.track_target).unwrap();
    assert_eq!(target.name, CAMERA_TARGET);
    assert_eq!(target.transform.location, DVec3::ZERO);
    assert_eq!(
        ctx.collection(CAMERA_COLLECTION).unwrap().objects,
        vec![rig.orbit_path, rig.track_target, rig.camera]
    );
}

#[test]
fn depth_of_field_is_optional() {
    let params = CameraParams {
        depth_of_field: false,
        ..CameraParams::default()
    };
    let (ctx, rig) = rig(&params);
    assert!(ctx.object(rig.camera).unwrap().camera().unwrap().dof.is_none());
}

#[test]
fn camera_rides_the_orbit() {
    let (ctx, rig) = rig(&CameraParams::default());
    let start = ctx.world_location(rig.camera, FrameIndex(1)).unwrap();
    let end = ctx.world_location(rig.camera, FrameIndex(450)).unwrap();
    let mid = ctx.world_location(rig.camera, FrameIndex(225)).unwrap();
    assert!((start - end).length() < 1e-9);
    assert!((start - mid).length() > 10.0);

    // distance from the orbit centre, ignoring the camera's own height offset
    let lift = DVec3::new(0.0, 0.0, 12.0);
    assert!(((mid - lift).length() - 48.0).abs() < 1e-9);
}

#[test]
fn rebuilding_keeps_two_constraints() {
    let mut ctx = SceneContext::new();
    let p = CameraParams::default();
    CameraOrbitAnimator::build(&mut ctx, &p, 8.0, frames(1, 450)).unwrap();
    let rig = CameraOrbitAnimator::build(&mut ctx, &p, 8.0, frames(1, 450)).unwrap();
    assert_eq!(ctx.object(rig.camera).unwrap().constraints.len(), 2);
    assert_eq!(ctx.objects().len(), 3);
}
