//! Orbiting, target-tracking camera rig.

use crate::animation::channel::KeyframeChannel;
use crate::foundation::core::{DVec3, FrameRange, Transform, euler_degrees};
use crate::foundation::error::SingularityResult;
use crate::scene::context::SceneContext;
use crate::scene::curve::CurvePath;
use crate::scene::object::{
    Axis, CameraLens, Constraint, ConstraintId, DepthOfField, FollowPath, Primitive, TrackTo,
};
use crate::scene::registry::ObjectId;
use crate::settings::CameraParams;

/// Collection the rig objects are linked into.
pub const CAMERA_COLLECTION: &str = "Camera_Rig";
/// Name of the shared empty the camera looks at.
pub const CAMERA_TARGET: &str = "CameraTarget";

/// Orbit radius in units of the event horizon radius.
pub const ORBIT_RADIUS_FACTOR: f64 = 6.0;
const ORBIT_TILT_X_DEG: f64 = 38.0;
const ORBIT_TILT_Z_DEG: f64 = 42.0;
const ORBIT_RESOLUTION: u32 = 64;
const CAMERA_HEIGHT_FACTOR: f64 = 0.25;
const FOCUS_DISTANCE_FACTOR: f64 = 1.1;

/// Handles to the camera rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraRig {
    /// Circular orbit curve.
    pub orbit_path: ObjectId,
    /// The camera.
    pub camera: ObjectId,
    /// Empty at the origin the camera tracks and focuses on.
    pub track_target: ObjectId,
    /// Follow-path constraint on the camera that owns the offset channel.
    pub follow_path: ConstraintId,
}

impl CameraRig {
    /// Path offset channel driving the orbit.
    pub fn offset_channel<'a>(&self, ctx: &'a SceneContext) -> Option<&'a KeyframeChannel<f64>> {
        ctx.objects()
            .get(self.camera)?
            .follow_path(self.follow_path)
            .map(|f| &f.offset)
    }
}

/// Builds the orbit path and the camera riding it.
pub struct CameraOrbitAnimator;

impl CameraOrbitAnimator {
    /// Build the rig for a black hole of `radius` and make its camera active.
    ///
    /// The offset channel has exactly two keys, `0` at `frames.start` and `1` at `frames.end`,
    /// so the camera completes one orbit across the render window.
    #[tracing::instrument(skip(ctx, params))]
    pub fn build(
        ctx: &mut SceneContext,
        params: &CameraParams,
        radius: f64,
        frames: FrameRange,
    ) -> SingularityResult<CameraRig> {
        let orbit_radius = radius * ORBIT_RADIUS_FACTOR;

        let orbit = CurvePath::circle(orbit_radius)
            .with_resolution(ORBIT_RESOLUTION)
            .with_path_duration(params.path_length);
        let orbit_path = ctx
            .objects
            .lookup_or_create("CameraOrbit", Primitive::Curve(orbit.clone()));
        {
            let o = ctx.object_mut(orbit_path)?;
            o.primitive = Primitive::Curve(orbit);
            o.transform.rotation = euler_degrees(ORBIT_TILT_X_DEG, 0.0, ORBIT_TILT_Z_DEG);
        }
        ctx.link_to_collection(CAMERA_COLLECTION, orbit_path)?;

        let track_target = ctx.objects.lookup_or_create(CAMERA_TARGET, Primitive::Empty);
        if ctx.object(track_target)?.collection.is_none() {
            ctx.object_mut(track_target)?.transform = Transform::at(DVec3::ZERO);
            ctx.link_to_collection(CAMERA_COLLECTION, track_target)?;
        }

        let lens = CameraLens {
            focal_length: params.focal_length,
            dof: params.depth_of_field.then(|| DepthOfField {
                focus_object: Some(track_target),
                focus_distance: orbit_radius * FOCUS_DISTANCE_FACTOR,
                aperture_fstop: params.aperture_fstop,
            }),
        };

        let mut offset = KeyframeChannel::new();
        offset.insert(frames.start, 0.0)?;
        offset.insert(frames.end, 1.0)?;

        let camera = ctx
            .objects
            .lookup_or_create("BlackHoleCamera", Primitive::Camera(lens.clone()));
        let follow_path = {
            let cam = ctx.object_mut(camera)?;
            cam.primitive = Primitive::Camera(lens);
            cam.transform = Transform::at(DVec3::new(
                0.0,
                0.0,
                orbit_radius * CAMERA_HEIGHT_FACTOR,
            ));
            cam.constraints.clear();
            let follow_path = cam.add_constraint(Constraint::FollowPath(FollowPath {
                target: orbit_path,
                offset,
                forward: Axis::Y,
                up: Axis::Z,
                curve_follow: false,
                fixed_location: true,
            }));
            cam.add_constraint(Constraint::TrackTo(TrackTo {
                target: track_target,
                track: Axis::NegZ,
                up: Axis::Y,
            }));
            follow_path
        };
        ctx.link_to_collection(CAMERA_COLLECTION, camera)?;
        ctx.set_active_camera(camera)?;

        Ok(CameraRig {
            orbit_path,
            camera,
            track_target,
            follow_path,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/camera.rs"]
mod tests;
