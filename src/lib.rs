//! Singularity builds a procedural black hole scene and hands it to an external renderer.
//!
//! A build takes a small [`SceneSettings`] document and produces, inside one explicit
//! [`SceneContext`]:
//!
//! - node-based material graphs for every body and the world background
//! - the black hole system (horizon, photon ring, accretion disk, dust, jets, lensing shell)
//! - an orbiting camera that tracks the hole
//! - image planes that fall in along a shared path on a staggered keyframed schedule
//!
//! The finished scene is captured as a [`SceneDocument`] and rendered through a
//! [`RenderDelegate`].
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod bodies;
pub(crate) mod camera;
pub(crate) mod composer;
pub(crate) mod ingest;
pub(crate) mod material;
pub(crate) mod render;
pub(crate) mod scene;
/// Scene settings and the JSON config document.
pub mod settings;

pub use crate::foundation::core::{
    Angle, DQuat, DVec3, FrameIndex, FrameRange, Rgba, Transform, euler_degrees,
};
pub use crate::foundation::error::{SingularityError, SingularityResult};

pub use crate::animation::channel::{Keyframe, KeyframeChannel, Lerp};
pub use crate::assets::discover::{IMAGE_EXTENSIONS, collect_images};
pub use crate::assets::probe::{aspect_ratio, plane_size};
pub use crate::bodies::{BLACK_HOLE_COLLECTION, CelestialBodies, CelestialBodyFactory};
pub use crate::camera::{CAMERA_COLLECTION, CAMERA_TARGET, CameraOrbitAnimator, CameraRig};
pub use crate::composer::{BuiltScene, SceneComposer, WORLD_MATERIAL};
pub use crate::ingest::{
    AssetIngestionPipeline, DeformationTargets, INGEST_COLLECTION, INGEST_PATH, IngestedAsset,
    arrival_frame, launch_frame,
};
pub use crate::material::builder::{
    MaterialGraphBuilder, MaterialKind, PLACED_EMISSION_STRENGTH, PLANE_EMISSION_STRENGTH,
};
pub use crate::material::fingerprint::{GraphFingerprint, fingerprint_graph};
pub use crate::material::graph::{
    BlendType, ColorStop, GradientType, GraphDomain, Link, MaterialGraph, MathOp, NodeId,
    NodeKind, RampInterpolation, ShaderNode, VectorMathOp, VoronoiFeature,
};
pub use crate::material::registry::{MaterialId, MaterialRegistry};
pub use crate::render::delegate::{
    ColorMode, Container, ImageFormat, InMemoryDelegate, MOTION_BLUR_SHUTTER, OutputFormat,
    RateFactor, RenderDelegate, RenderRequest, VideoCodec,
};
pub use crate::render::export::{MaterialEntry, ObjectEntry, SCENE_DOCUMENT_VERSION, SceneDocument};
pub use crate::render::process::{
    ProcessDelegate, ProcessDelegateOpts, ensure_parent_dir, is_renderer_on_path,
};
pub use crate::scene::context::{Collection, SceneContext};
pub use crate::scene::curve::{BezierPoint, CurvePath, CurveShape};
pub use crate::scene::object::{
    Axis, CameraLens, Constraint, ConstraintId, DeformMethod, DepthOfField, DisplayMode,
    FollowPath, Modifier, ModifierId, ModifierKind, Primitive, SceneObject, SimpleDeform, TrackTo,
};
pub use crate::scene::registry::{ObjectId, ObjectRegistry};
pub use crate::settings::{
    BlackHoleParams, CameraParams, KERR_SPIN_LIMIT, RenderParams, SceneConfig, SceneSettings,
};
