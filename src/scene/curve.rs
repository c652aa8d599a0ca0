use std::f64::consts::TAU;

use crate::foundation::core::DVec3;

/// One control point of a cubic bezier spline, with absolute handle positions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BezierPoint {
    /// Control point.
    pub co: DVec3,
    /// Incoming handle.
    pub handle_left: DVec3,
    /// Outgoing handle.
    pub handle_right: DVec3,
}

impl BezierPoint {
    /// Point with both handles collapsed onto it.
    pub fn new(co: DVec3) -> Self {
        Self {
            co,
            handle_left: co,
            handle_right: co,
        }
    }

    /// Place the outgoing handle at `co + offset`.
    pub fn with_handle_right(mut self, offset: DVec3) -> Self {
        self.handle_right = self.co + offset;
        self
    }

    /// Place the incoming handle at `co + offset`.
    pub fn with_handle_left(mut self, offset: DVec3) -> Self {
        self.handle_left = self.co + offset;
        self
    }
}

/// Shape of a path curve.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveShape {
    /// Open or cyclic bezier spline.
    Bezier {
        /// Control points in path order.
        points: Vec<BezierPoint>,
        /// Close the spline back onto its first point.
        cyclic: bool,
    },
    /// Circle in the local XY plane, starting at `+X` and running counter-clockwise.
    Circle {
        /// Circle radius.
        radius: f64,
    },
}

/// A curve objects can be bound to through a follow-path constraint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurvePath {
    /// Geometry.
    pub shape: CurveShape,
    /// Evaluation steps per segment used by the renderer.
    pub resolution: u32,
    /// Frames a follower needs to traverse the whole path.
    pub path_duration: u32,
}

impl CurvePath {
    /// Bezier spline path.
    pub fn bezier(points: Vec<BezierPoint>, cyclic: bool) -> Self {
        Self {
            shape: CurveShape::Bezier { points, cyclic },
            resolution: 12,
            path_duration: 100,
        }
    }

    /// Circular path.
    pub fn circle(radius: f64) -> Self {
        Self {
            shape: CurveShape::Circle { radius },
            resolution: 12,
            path_duration: 100,
        }
    }

    /// Set the per-segment resolution.
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the path duration in frames.
    pub fn with_path_duration(mut self, frames: u32) -> Self {
        self.path_duration = frames;
        self
    }

    /// Local-space position at normalized path parameter `t`, clamped to `[0, 1]`.
    ///
    /// The parameter is uniform per segment, not per unit of arc length. Returns `None` for
    /// a bezier spline without points.
    pub fn point_at(&self, t: f64) -> Option<DVec3> {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match &self.shape {
            CurveShape::Circle { radius } => {
                let a = TAU * t;
                Some(DVec3::new(radius * a.cos(), radius * a.sin(), 0.0))
            }
            CurveShape::Bezier { points, cyclic } => {
                let (first, last) = (points.first()?, points.last()?);
                let segments = if *cyclic {
                    points.len()
                } else {
                    points.len() - 1
                };
                if segments == 0 {
                    return Some(first.co);
                }
                if t >= 1.0 && !*cyclic {
                    return Some(last.co);
                }

                let s = t * segments as f64;
                let i = (s.floor() as usize).min(segments - 1);
                let u = s - i as f64;
                let a = &points[i];
                let b = &points[(i + 1) % points.len()];
                Some(cubic(a.co, a.handle_right, b.handle_left, b.co, u))
            }
        }
    }

    /// Polyline approximation with `resolution` steps per segment.
    pub fn sample(&self) -> Vec<DVec3> {
        let segments = match &self.shape {
            CurveShape::Circle { .. } => 4,
            CurveShape::Bezier { points, cyclic } if *cyclic => points.len(),
            CurveShape::Bezier { points, .. } => points.len().saturating_sub(1),
        };
        let steps = segments * self.resolution.max(1) as usize;
        if steps == 0 {
            return self.point_at(0.0).into_iter().collect();
        }
        (0..=steps)
            .filter_map(|k| self.point_at(k as f64 / steps as f64))
            .collect()
    }
}

fn cubic(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, u: f64) -> DVec3 {
    let v = 1.0 - u;
    p0 * (v * v * v) + p1 * (3.0 * v * v * u) + p2 * (3.0 * v * u * u) + p3 * (u * u * u)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/curve.rs"]
mod tests;
