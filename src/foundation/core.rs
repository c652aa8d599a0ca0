use crate::foundation::error::{SingularityError, SingularityResult};

pub use glam::{DQuat, DVec3};

/// Frame number on the scene timeline.
///
/// Frames are signed so a channel can be sampled before the render window starts.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub i64);

/// Inclusive frame window `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First rendered frame.
    pub start: FrameIndex,
    /// Last rendered frame (inclusive).
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start < end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> SingularityResult<Self> {
        if end.0 <= start.0 {
            return Err(SingularityError::validation(format!(
                "frame range end ({}) must be greater than start ({})",
                end.0, start.0
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of frames in the window, both ends included.
    pub fn len_frames(self) -> u64 {
        (self.end.0 - self.start.0 + 1).max(0) as u64
    }

    /// Return `true` when `f` is inside `[start, end]`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 <= self.end.0
    }
}

/// An angle, stored in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Angle(f64);

impl Angle {
    /// Zero rotation.
    pub const ZERO: Self = Self(0.0);

    /// Build from radians.
    pub fn from_radians(rad: f64) -> Self {
        Self(rad)
    }

    /// Build from degrees.
    pub fn from_degrees(deg: f64) -> Self {
        Self(deg.to_radians())
    }

    /// Value in radians.
    pub fn radians(self) -> f64 {
        self.0
    }

    /// Value in degrees.
    pub fn degrees(self) -> f64 {
        self.0.to_degrees()
    }
}

/// Linear (scene-referred) RGBA color with float channels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque color from linear RGB components.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from an `[r, g, b]` triple.
    pub const fn from_rgb(c: [f64; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

/// Object transform: location, XYZ Euler rotation (radians), and scale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// World-space location.
    pub location: DVec3,
    /// Euler rotation in radians, applied X first, then Y, then Z.
    pub rotation: DVec3,
    /// Per-axis scale.
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform moved to `location`.
    pub fn at(location: DVec3) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    /// Rotation as a quaternion (`Rz * Ry * Rx`).
    pub fn quat(&self) -> DQuat {
        DQuat::from_rotation_z(self.rotation.z)
            * DQuat::from_rotation_y(self.rotation.y)
            * DQuat::from_rotation_x(self.rotation.x)
    }

    /// Map a point from object space into world space.
    pub fn transform_point(&self, p: DVec3) -> DVec3 {
        self.location + self.quat() * (self.scale * p)
    }
}

/// Euler rotation vector from degrees.
pub fn euler_degrees(x: f64, y: f64, z: f64) -> DVec3 {
    DVec3::new(x.to_radians(), y.to_radians(), z.to_radians())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
