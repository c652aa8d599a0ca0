use crate::foundation::core::{Angle, DVec3, FrameIndex};
use crate::foundation::error::{SingularityError, SingularityResult};

/// Interpolation contract for channel value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Angle {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Angle::from_radians(a.radians() + (b.radians() - a.radians()) * t)
    }
}

impl Lerp for DVec3 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

/// One control point of a [`KeyframeChannel`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Frame the value is pinned to.
    pub frame: FrameIndex,
    /// Value at `frame`.
    pub value: T,
}

/// A sparse, linearly interpolated time series for one animated value.
///
/// Keys are strictly increasing in frame. Sampling clamps to the first/last value outside the
/// keyed range.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeChannel<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> Default for KeyframeChannel<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T> KeyframeChannel<T>
where
    T: Lerp + Clone,
{
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a control point.
    ///
    /// Frames must arrive in non-decreasing order. Inserting at the frame of the last key
    /// replaces its value.
    pub fn insert(&mut self, frame: FrameIndex, value: T) -> SingularityResult<()> {
        match self.keys.last_mut() {
            Some(last) if frame.0 < last.frame.0 => {
                return Err(SingularityError::animation(format!(
                    "keyframe at frame {} inserted after frame {}",
                    frame.0, last.frame.0
                )));
            }
            Some(last) if frame.0 == last.frame.0 => {
                last.value = value;
            }
            _ => self.keys.push(Keyframe { frame, value }),
        }
        Ok(())
    }

    /// Borrow the control points in frame order.
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// Return `true` when no keys have been inserted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Value of the first key, if any.
    pub fn first_value(&self) -> Option<&T> {
        self.keys.first().map(|k| &k.value)
    }

    /// Value of the last key, if any.
    pub fn last_value(&self) -> Option<&T> {
        self.keys.last().map(|k| &k.value)
    }

    /// Sample at an integer frame.
    pub fn evaluate(&self, frame: FrameIndex) -> SingularityResult<T> {
        self.evaluate_at(frame.0 as f64)
    }

    /// Sample at a fractional frame time.
    pub fn evaluate_at(&self, time: f64) -> SingularityResult<T> {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(SingularityError::animation(
                    "cannot evaluate a channel with no keyframes",
                ));
            }
        };

        if time <= first.frame.0 as f64 {
            return Ok(first.value.clone());
        }
        if time >= last.frame.0 as f64 {
            return Ok(last.value.clone());
        }

        let idx = self.keys.partition_point(|k| (k.frame.0 as f64) <= time);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = (b.frame.0 - a.frame.0) as f64;
        let t = (time - a.frame.0 as f64) / span;
        Ok(T::lerp(&a.value, &b.value, t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/channel.rs"]
mod tests;
