use crate::animation::channel::KeyframeChannel;
use crate::foundation::core::{DVec3, Transform};
use crate::material::registry::MaterialId;
use crate::scene::curve::CurvePath;
use crate::scene::registry::ObjectId;

/// Viewport display mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Shaded.
    #[default]
    Solid,
    /// Wireframe only.
    Wire,
}

/// Object-space axis, optionally negated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
pub enum Axis {
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

/// Depth of field settings of a camera.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DepthOfField {
    /// Object the focus plane tracks; takes precedence over `focus_distance`.
    pub focus_object: Option<ObjectId>,
    /// Fallback focus distance in scene units.
    pub focus_distance: f64,
    /// Aperture f-stop.
    pub aperture_fstop: f64,
}

/// Camera data block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraLens {
    /// Focal length in millimetres.
    pub focal_length: f64,
    /// Depth of field, when enabled.
    pub dof: Option<DepthOfField>,
}

/// Geometry (or data block) an object is instantiated from.
///
/// Sizes are in scene units. A cone has its base at local `+depth/2` on Z and its tip at
/// `-depth/2`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Primitive {
    UvSphere { radius: f64 },
    Torus { major_radius: f64, minor_radius: f64 },
    Cone { base_radius: f64, depth: f64 },
    Plane { width: f64, height: f64 },
    Curve(CurvePath),
    Camera(CameraLens),
    Empty,
}

impl Primitive {
    /// Borrow the path of a curve object.
    pub fn as_curve(&self) -> Option<&CurvePath> {
        match self {
            Self::Curve(c) => Some(c),
            _ => None,
        }
    }
}

/// Handle to a constraint on a specific object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ConstraintId(pub u32);

/// Handle to a modifier on a specific object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ModifierId(pub u32);

/// Binds an object to a curve; `offset` is the normalized path parameter over time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FollowPath {
    /// Curve object followed.
    pub target: ObjectId,
    /// Path parameter in `[0, 1]`, keyed over frames.
    pub offset: KeyframeChannel<f64>,
    /// Axis aligned with the path tangent.
    pub forward: Axis,
    /// Axis kept pointing up.
    pub up: Axis,
    /// Rotate the follower with the curve tangent.
    pub curve_follow: bool,
    /// Position by `offset` instead of by the curve's own path duration.
    pub fixed_location: bool,
}

/// Orients an object so `track` points at `target`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackTo {
    /// Object looked at.
    pub target: ObjectId,
    /// Axis that points at the target.
    pub track: Axis,
    /// Axis kept pointing up.
    pub up: Axis,
}

/// Object constraint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Constraint {
    FollowPath(FollowPath),
    TrackTo(TrackTo),
}

/// Simple deform method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum DeformMethod {
    Twist,
    Stretch,
    Bend,
    Taper,
}

/// One-parameter deformation along an axis.
///
/// `value` is an angle in radians for twist and bend, and a factor for stretch and taper. When
/// `channel` has keys it drives `value` over time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimpleDeform {
    /// Deform method.
    pub method: DeformMethod,
    /// Deform axis.
    pub axis: Axis,
    /// Static value.
    pub value: f64,
    /// Animated value.
    pub channel: KeyframeChannel<f64>,
}

impl SimpleDeform {
    /// Static deform.
    pub fn new(method: DeformMethod, axis: Axis, value: f64) -> Self {
        Self {
            method,
            axis,
            value,
            channel: KeyframeChannel::new(),
        }
    }
}

/// Modifier payload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModifierKind {
    /// Bend the mesh along a curve object.
    CurveWrap {
        /// Curve object.
        object: ObjectId,
    },
    /// Simple deform.
    SimpleDeform(SimpleDeform),
}

/// Named modifier in an object's stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Modifier {
    /// Display name.
    pub name: String,
    /// Payload.
    pub kind: ModifierKind,
}

/// A named entity in the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneObject {
    /// Unique name.
    pub name: String,
    /// Geometry or data block.
    pub primitive: Primitive,
    /// Rest transform.
    pub transform: Transform,
    /// Assigned material.
    pub material: Option<MaterialId>,
    /// Viewport display mode.
    pub display: DisplayMode,
    /// Light portal flag for the path tracer.
    pub portal: bool,
    /// Collection the object is linked into.
    pub collection: Option<String>,
    /// Constraints in evaluation order.
    pub constraints: Vec<Constraint>,
    /// Modifier stack in evaluation order.
    pub modifiers: Vec<Modifier>,
    /// Animated scale, when keyed.
    pub scale_channel: Option<KeyframeChannel<DVec3>>,
}

impl SceneObject {
    /// Object with an identity transform and nothing attached.
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            primitive,
            transform: Transform::default(),
            material: None,
            display: DisplayMode::Solid,
            portal: false,
            collection: None,
            constraints: Vec::new(),
            modifiers: Vec::new(),
            scale_channel: None,
        }
    }

    /// Append a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        self.constraints.push(constraint);
        ConstraintId((self.constraints.len() - 1) as u32)
    }

    /// Append a modifier.
    pub fn add_modifier(&mut self, name: impl Into<String>, kind: ModifierKind) -> ModifierId {
        self.modifiers.push(Modifier {
            name: name.into(),
            kind,
        });
        ModifierId((self.modifiers.len() - 1) as u32)
    }

    /// Follow-path constraint behind `id`.
    pub fn follow_path(&self, id: ConstraintId) -> Option<&FollowPath> {
        match self.constraints.get(id.0 as usize)? {
            Constraint::FollowPath(f) => Some(f),
            _ => None,
        }
    }

    /// Mutable follow-path constraint behind `id`.
    pub fn follow_path_mut(&mut self, id: ConstraintId) -> Option<&mut FollowPath> {
        match self.constraints.get_mut(id.0 as usize)? {
            Constraint::FollowPath(f) => Some(f),
            _ => None,
        }
    }

    /// First follow-path constraint, if any.
    pub fn first_follow_path(&self) -> Option<&FollowPath> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::FollowPath(f) => Some(f),
            _ => None,
        })
    }

    /// First track-to constraint, if any.
    pub fn track_to(&self) -> Option<&TrackTo> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::TrackTo(t) => Some(t),
            _ => None,
        })
    }

    /// Simple deform behind `id`.
    pub fn deform(&self, id: ModifierId) -> Option<&SimpleDeform> {
        match &self.modifiers.get(id.0 as usize)?.kind {
            ModifierKind::SimpleDeform(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable simple deform behind `id`.
    pub fn deform_mut(&mut self, id: ModifierId) -> Option<&mut SimpleDeform> {
        match &mut self.modifiers.get_mut(id.0 as usize)?.kind {
            ModifierKind::SimpleDeform(d) => Some(d),
            _ => None,
        }
    }

    /// Camera data, when this object is a camera.
    pub fn camera(&self) -> Option<&CameraLens> {
        match &self.primitive {
            Primitive::Camera(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/object.rs"]
mod tests;
