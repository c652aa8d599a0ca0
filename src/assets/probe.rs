use std::path::Path;

/// Height of a textured ingestion plane in scene units; width follows the image aspect.
pub const PLANE_HEIGHT: f64 = 2.0;

/// Width over height of the image at `path`, read from its header.
///
/// Returns `None` when the file cannot be opened or decoded, or reports a zero dimension.
pub fn aspect_ratio(path: &Path) -> Option<f64> {
    match image::image_dimensions(path) {
        Ok((w, h)) if w > 0 && h > 0 => Some(f64::from(w) / f64::from(h)),
        Ok((w, h)) => {
            tracing::warn!(path = %path.display(), w, h, "image has a zero dimension");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to probe image size");
            None
        }
    }
}

/// Plane `(width, height)` for an image with the given aspect ratio. Unknown aspect gives a
/// square.
pub fn plane_size(aspect: Option<f64>) -> (f64, f64) {
    let aspect = aspect.filter(|a| a.is_finite() && *a > 0.0).unwrap_or(1.0);
    (PLANE_HEIGHT * aspect, PLANE_HEIGHT)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/probe.rs"]
mod tests;
