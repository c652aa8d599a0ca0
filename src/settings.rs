//! Scene settings and the JSON configuration document that overrides them.
//!
//! Every section is optional and every field falls back to its default, so a document only
//! names what it changes. Unknown fields are rejected.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{SingularityError, SingularityResult};

/// Upper spin bound conventionally used for a Kerr black hole.
pub const KERR_SPIN_LIMIT: f64 = 0.998;

/// Physical knobs of the black hole and its ingestion behaviour.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlackHoleParams {
    /// Relative mass.
    pub mass: f64,
    /// Dimensionless spin, conventionally in `[0, 0.998]`.
    pub spin: f64,
    /// Event horizon radius in scene units; every body is sized from it.
    pub radius: f64,
    /// Base accretion disk color (linear RGB).
    pub disk_color: [f64; 3],
    /// Emission strength of the near accretion disk.
    pub disk_intensity: f64,
    /// Scales the frame at which ingested assets arrive.
    pub ingestion_speed: f64,
    /// Tidal stretch applied to ingested assets.
    pub stretch_factor: f64,
}

impl Default for BlackHoleParams {
    fn default() -> Self {
        Self {
            mass: 5.0,
            spin: 0.7,
            radius: 8.0,
            disk_color: [1.0, 0.45, 0.1],
            disk_intensity: 6.0,
            ingestion_speed: 1.0,
            stretch_factor: 3.0,
        }
    }
}

/// Orbit camera settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraParams {
    /// Frame count the orbit path is parametrized over.
    pub path_length: u32,
    /// Lens focal length in millimetres.
    pub focal_length: f64,
    /// Enable depth of field.
    pub depth_of_field: bool,
    /// Aperture f-stop used when depth of field is on.
    pub aperture_fstop: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            path_length: 360,
            focal_length: 55.0,
            depth_of_field: true,
            aperture_fstop: 2.2,
        }
    }
}

/// Output and timeline settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    /// Output width in pixels.
    pub resolution_x: u32,
    /// Output height in pixels.
    pub resolution_y: u32,
    /// Frames per second.
    pub frame_rate: u32,
    /// First frame of the render window.
    pub frame_start: i64,
    /// Last frame of the render window (inclusive).
    pub frame_end: i64,
    /// Primary video artifact. `//` prefixes and relative paths resolve against the config
    /// directory.
    pub output_path: String,
    /// Path tracer samples per pixel.
    pub samples: u32,
    /// Optional still preview rendered at `frame_start`.
    #[serde(alias = "preview_still_path")]
    pub preview_path: Option<String>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            resolution_x: 3840,
            resolution_y: 2160,
            frame_rate: 30,
            frame_start: 1,
            frame_end: 450,
            output_path: "//output/blackhole_anim.mp4".to_string(),
            samples: 1024,
            preview_path: Some("//output/blackhole_preview.png".to_string()),
        }
    }
}

/// Immutable input to a scene build.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneSettings {
    /// Black hole section.
    pub blackhole: BlackHoleParams,
    /// Camera section.
    pub camera: CameraParams,
    /// Render section.
    pub render: RenderParams,
}

impl SceneSettings {
    /// Reject settings the core cannot build from.
    pub fn validate(&self) -> SingularityResult<()> {
        let bh = &self.blackhole;
        let r = &self.render;

        self.frame_range()?;
        if r.resolution_x == 0 || r.resolution_y == 0 {
            return Err(SingularityError::validation(
                "render resolution must be non-zero",
            ));
        }
        if r.frame_rate == 0 {
            return Err(SingularityError::validation("frame_rate must be > 0"));
        }
        if r.samples == 0 {
            return Err(SingularityError::validation("samples must be > 0"));
        }
        if !bh.radius.is_finite() || bh.radius <= 0.0 {
            return Err(SingularityError::validation(
                "blackhole radius must be finite and > 0",
            ));
        }
        if !bh.ingestion_speed.is_finite() || bh.ingestion_speed <= 0.0 {
            return Err(SingularityError::validation(
                "ingestion_speed must be finite and > 0",
            ));
        }
        if !bh.stretch_factor.is_finite() || bh.stretch_factor < 0.0 {
            return Err(SingularityError::validation(
                "stretch_factor must be finite and >= 0",
            ));
        }
        if !(0.0..=KERR_SPIN_LIMIT).contains(&bh.spin) {
            tracing::warn!(
                spin = bh.spin,
                "spin outside the Kerr range [0, {KERR_SPIN_LIMIT}], building anyway"
            );
        }
        Ok(())
    }

    /// The render window, validated to be non-empty.
    pub fn frame_range(&self) -> SingularityResult<FrameRange> {
        FrameRange::new(
            FrameIndex(self.render.frame_start),
            FrameIndex(self.render.frame_end),
        )
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigDocument {
    blackhole: BlackHoleParams,
    camera: CameraParams,
    render: RenderParams,
    images_dir: Option<String>,
}

const DEFAULT_IMAGES_DIR: &str = "../assets/input_brainrot";

/// Settings plus the filesystem context they were loaded from.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Validated scene settings.
    pub settings: SceneSettings,
    /// Directory scanned for ingestion images.
    pub images_dir: PathBuf,
    /// Directory relative paths are resolved against.
    pub base_dir: PathBuf,
}

impl SceneConfig {
    /// Defaults, with paths anchored at `base_dir`.
    pub fn defaults(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            settings: SceneSettings::default(),
            images_dir: resolve_in(&base_dir, DEFAULT_IMAGES_DIR),
            base_dir,
        }
    }

    /// Parse and validate a config document.
    pub fn from_reader<R: std::io::Read>(
        r: R,
        base_dir: impl Into<PathBuf>,
    ) -> SingularityResult<Self> {
        let base_dir = base_dir.into();
        let doc: ConfigDocument = serde_json::from_reader(r)
            .map_err(|e| SingularityError::serde(format!("parse config JSON: {e}")))?;
        let settings = SceneSettings {
            blackhole: doc.blackhole,
            camera: doc.camera,
            render: doc.render,
        };
        settings.validate()?;

        let images_dir = resolve_in(
            &base_dir,
            doc.images_dir.as_deref().unwrap_or(DEFAULT_IMAGES_DIR),
        );
        Ok(Self {
            settings,
            images_dir,
            base_dir,
        })
    }

    /// Load a config document from disk. Paths inside it resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> SingularityResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SingularityError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_reader(BufReader::new(f), base_dir)
    }

    /// Resolve a config-relative path.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        resolve_in(&self.base_dir, raw)
    }

    /// Absolute location of the primary video artifact.
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.settings.render.output_path)
    }

    /// Absolute location of the preview still, when one is requested.
    pub fn preview_path(&self) -> Option<PathBuf> {
        self.settings
            .render
            .preview_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| self.resolve(p))
    }
}

/// `//x` and `x` both mean `base/x`; absolute paths pass through.
fn resolve_in(base: &Path, raw: &str) -> PathBuf {
    let trimmed = raw.strip_prefix("//").unwrap_or(raw);
    let candidate = Path::new(trimmed);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
