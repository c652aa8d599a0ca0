//! Image planes that fall into the black hole along a shared path.
//!
//! Every asset gets a plane (textured from the image, or a solid placeholder when the file is
//! missing), a follow-path binding to the ingestion curve, a curve-wrap modifier, and twist and
//! stretch deforms. Assets launch staggered over the first 60 frames and all arrive together.

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::channel::KeyframeChannel;
use crate::assets::probe;
use crate::foundation::core::{DVec3, FrameIndex, FrameRange, Rgba};
use crate::foundation::error::{SingularityError, SingularityResult};
use crate::material::builder::{MaterialGraphBuilder, MaterialKind, PLACED_EMISSION_STRENGTH};
use crate::material::registry::MaterialId;
use crate::scene::context::SceneContext;
use crate::scene::curve::{BezierPoint, CurvePath};
use crate::scene::object::{
    Axis, Constraint, ConstraintId, DeformMethod, FollowPath, ModifierId, ModifierKind, Primitive,
    SimpleDeform,
};
use crate::scene::registry::ObjectId;
use crate::settings::BlackHoleParams;

/// Collection ingested planes and their path are linked into.
pub const INGEST_COLLECTION: &str = "Ingested_Images";
/// Name of the shared ingestion curve.
pub const INGEST_PATH: &str = "Ingest_Path";

/// Frames over which launches are spread.
pub const LAUNCH_WINDOW: i64 = 60;
const PATH_RESOLUTION: u32 = 64;
const PATH_DURATION_PER_SPEED: f64 = 200.0;
const BASE_SCALE: f64 = 1.2;
const PLACEHOLDER_SIZE: f64 = 2.0;
const STRETCH_GAIN: f64 = 3.5;
const TWIST_TURNS_PER_SPIN: f64 = 2.0;

/// One ingested image and typed handles to everything attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct IngestedAsset {
    /// Image the plane was built from (may not exist).
    pub source_path: PathBuf,
    /// Position in the sorted asset list.
    pub index: usize,
    /// Size of the asset list.
    pub total: usize,
    /// The plane.
    pub object: ObjectId,
    /// Its material.
    pub material: MaterialId,
    /// `true` when the image was missing and a solid color stands in.
    pub placeholder: bool,
    /// Follow-path constraint on the plane.
    pub follow_path: ConstraintId,
    /// Twist deform on the plane.
    pub twist: ModifierId,
    /// Stretch deform on the plane.
    pub stretch: ModifierId,
}

/// Frame an asset starts moving: `start + floor(index / max(total, 1) * 60)`.
pub fn launch_frame(frame_start: FrameIndex, index: usize, total: usize) -> FrameIndex {
    let fraction = index as f64 / total.max(1) as f64;
    FrameIndex(frame_start.0 + (fraction * LAUNCH_WINDOW as f64).floor() as i64)
}

/// Frame every asset reaches the horizon: `floor(end * ingestion_speed)`.
pub fn arrival_frame(frame_end: FrameIndex, ingestion_speed: f64) -> FrameIndex {
    FrameIndex((frame_end.0 as f64 * ingestion_speed).floor() as i64)
}

/// Keyframe targets reached at arrival.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeformationTargets {
    /// Stretch factor.
    pub stretch: f64,
    /// Twist angle in radians.
    pub twist: f64,
    /// Object scale.
    pub scale: DVec3,
}

impl DeformationTargets {
    /// Targets for the given black hole.
    pub fn for_params(params: &BlackHoleParams) -> Self {
        Self {
            stretch: 1.0 + STRETCH_GAIN * params.stretch_factor,
            twist: TAU * params.spin * TWIST_TURNS_PER_SPIN,
            scale: DVec3::new(0.2, 4.0 * params.stretch_factor, 0.2),
        }
    }
}

/// Builds and animates ingested planes.
pub struct AssetIngestionPipeline {
    rng: StdRng,
}

impl Default for AssetIngestionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetIngestionPipeline {
    /// Pipeline with entropy-seeded placeholder colors.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Pipeline with reproducible placeholder colors.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build the shared path and one plane per asset, in order, and key their motion.
    #[tracing::instrument(skip_all, fields(assets = assets.len()))]
    pub fn ingest(
        &mut self,
        ctx: &mut SceneContext,
        assets: &[PathBuf],
        params: &BlackHoleParams,
        frames: FrameRange,
    ) -> SingularityResult<Vec<IngestedAsset>> {
        let path = create_ingest_path(ctx, params)?;
        let total = assets.len();
        let mut out = Vec::with_capacity(total);
        for (index, source) in assets.iter().enumerate() {
            let asset = self.create_plane(ctx, path, source, index, total, params)?;
            animate(ctx, &asset, params, frames)?;
            out.push(asset);
        }
        tracing::info!(
            planes = out.len(),
            placeholders = out.iter().filter(|a| a.placeholder).count(),
            "ingestion built"
        );
        Ok(out)
    }

    fn create_plane(
        &mut self,
        ctx: &mut SceneContext,
        path: ObjectId,
        source: &Path,
        index: usize,
        total: usize,
        params: &BlackHoleParams,
    ) -> SingularityResult<IngestedAsset> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());
        let name = format!("Ingest_{index:03}_{stem}");

        let placeholder = !source.is_file();
        let (primitive, mat_name, kind) = if placeholder {
            tracing::warn!(path = %source.display(), "image missing, using placeholder");
            let color = Rgba::rgb(
                self.rng.gen_range(0.0..1.0),
                self.rng.gen_range(0.0..1.0),
                self.rng.gen_range(0.0..1.0),
            );
            (
                Primitive::Plane {
                    width: PLACEHOLDER_SIZE,
                    height: PLACEHOLDER_SIZE,
                },
                format!("{name}_Placeholder_MAT"),
                MaterialKind::Placeholder { color },
            )
        } else {
            let (width, height) = probe::plane_size(probe::aspect_ratio(source));
            (
                Primitive::Plane { width, height },
                format!("{name}_MAT"),
                MaterialKind::ImagePlane {
                    path: source.to_path_buf(),
                },
            )
        };

        let material = MaterialGraphBuilder::build(&mut ctx.materials, &mat_name, &kind, params)?;
        ctx.materials
            .get_mut(material)
            .ok_or_else(|| SingularityError::graph(format!("material '{mat_name}' vanished")))?
            .set_emission_strength(PLACED_EMISSION_STRENGTH);

        let object = ctx.objects.lookup_or_create(&name, primitive.clone());
        let (follow_path, twist, stretch) = {
            let obj = ctx.object_mut(object)?;
            obj.primitive = primitive;
            obj.material = Some(material);
            obj.transform.scale = DVec3::splat(BASE_SCALE);
            obj.constraints.clear();
            obj.modifiers.clear();
            obj.scale_channel = None;

            let follow_path = obj.add_constraint(Constraint::FollowPath(FollowPath {
                target: path,
                offset: KeyframeChannel::new(),
                forward: Axis::Y,
                up: Axis::Z,
                curve_follow: true,
                fixed_location: true,
            }));
            obj.add_modifier("SpiralWrap", ModifierKind::CurveWrap { object: path });
            let twist = obj.add_modifier(
                "Twist",
                ModifierKind::SimpleDeform(SimpleDeform::new(DeformMethod::Twist, Axis::Z, 0.0)),
            );
            let stretch = obj.add_modifier(
                "Stretch",
                ModifierKind::SimpleDeform(SimpleDeform::new(DeformMethod::Stretch, Axis::Z, 0.0)),
            );
            (follow_path, twist, stretch)
        };
        ctx.link_to_collection(INGEST_COLLECTION, object)?;

        Ok(IngestedAsset {
            source_path: source.to_path_buf(),
            index,
            total,
            object,
            material,
            placeholder,
            follow_path,
            twist,
            stretch,
        })
    }
}

fn create_ingest_path(
    ctx: &mut SceneContext,
    params: &BlackHoleParams,
) -> SingularityResult<ObjectId> {
    let r = params.radius;
    let entry = BezierPoint::new(DVec3::new(3.5 * r, 0.0, 0.5 * r))
        .with_handle_right(DVec3::new(-r, 0.2 * r, 0.0));
    let sink = BezierPoint::new(DVec3::ZERO).with_handle_left(DVec3::new(0.2 * r, -0.3 * r, 0.0));
    let duration = (params.ingestion_speed * PATH_DURATION_PER_SPEED).floor().max(0.0) as u32;
    let curve = CurvePath::bezier(vec![entry, sink], false)
        .with_resolution(PATH_RESOLUTION)
        .with_path_duration(duration);

    let id = ctx
        .objects
        .lookup_or_create(INGEST_PATH, Primitive::Curve(curve.clone()));
    ctx.object_mut(id)?.primitive = Primitive::Curve(curve);
    ctx.link_to_collection(INGEST_COLLECTION, id)?;
    Ok(id)
}

/// Key path offset, twist, stretch, and scale from launch to arrival.
///
/// A plane whose bindings cannot be resolved, or whose arrival precedes its launch, is left
/// static with a warning.
pub fn animate(
    ctx: &mut SceneContext,
    asset: &IngestedAsset,
    params: &BlackHoleParams,
    frames: FrameRange,
) -> SingularityResult<()> {
    let launch = launch_frame(frames.start, asset.index, asset.total);
    let arrival = arrival_frame(frames.end, params.ingestion_speed);
    if arrival < launch {
        tracing::warn!(
            index = asset.index,
            launch = launch.0,
            arrival = arrival.0,
            "arrival precedes launch, leaving asset static"
        );
        return Ok(());
    }

    let Some(obj) = ctx.objects.get_mut(asset.object) else {
        tracing::warn!(index = asset.index, "ingested object missing, skipping animation");
        return Ok(());
    };
    if obj.follow_path(asset.follow_path).is_none()
        || obj.deform(asset.twist).is_none()
        || obj.deform(asset.stretch).is_none()
    {
        tracing::warn!(
            object = %obj.name,
            "incomplete animation binding, skipping animation"
        );
        return Ok(());
    }

    let targets = DeformationTargets::for_params(params);
    if let Some(follow) = obj.follow_path_mut(asset.follow_path) {
        follow.offset.insert(launch, 0.0)?;
        follow.offset.insert(arrival, 1.0)?;
    }
    if let Some(stretch) = obj.deform_mut(asset.stretch) {
        stretch.channel.insert(launch, 0.0)?;
        stretch.channel.insert(arrival, targets.stretch)?;
    }
    if let Some(twist) = obj.deform_mut(asset.twist) {
        twist.channel.insert(launch, 0.0)?;
        twist.channel.insert(arrival, targets.twist)?;
    }
    let scale = obj.scale_channel.get_or_insert_with(KeyframeChannel::new);
    scale.insert(launch, DVec3::ONE)?;
    scale.insert(arrival, targets.scale)?;

    tracing::debug!(
        object = %obj.name,
        launch = launch.0,
        arrival = arrival.0,
        "ingestion keyed"
    );
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/ingest.rs"]
mod tests;
