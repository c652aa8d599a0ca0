use std::path::PathBuf;

use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::SingularityResult;
use crate::render::export::SceneDocument;

/// Motion blur shutter, in frames, requested for every render.
pub const MOTION_BLUR_SHUTTER: f64 = 0.5;

/// Video container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Container {
    Mpeg4,
}

/// Video codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum VideoCodec {
    H264,
}

/// Constant rate factor preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum RateFactor {
    High,
}

/// Still image encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ImageFormat {
    Png,
}

/// Still image channel layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ColorMode {
    Rgb,
}

/// What the renderer writes to `output_path`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputFormat {
    /// Encoded animation over the whole frame range.
    Video {
        /// Container.
        container: Container,
        /// Codec.
        codec: VideoCodec,
        /// Quality preset.
        crf: RateFactor,
    },
    /// Single image of the first frame of the range.
    Still {
        /// Encoding.
        format: ImageFormat,
        /// Bits per channel.
        color_depth: u8,
        /// Channel layout.
        color_mode: ColorMode,
    },
}

impl OutputFormat {
    /// MPEG-4 / H.264 at the high quality preset.
    pub const VIDEO: Self = Self::Video {
        container: Container::Mpeg4,
        codec: VideoCodec::H264,
        crf: RateFactor::High,
    };

    /// 8-bit RGB PNG.
    pub const PNG_STILL: Self = Self::Still {
        format: ImageFormat::Png,
        color_depth: 8,
        color_mode: ColorMode::Rgb,
    };

    /// Return `true` for still formats.
    pub fn is_still(&self) -> bool {
        matches!(self, Self::Still { .. })
    }
}

/// Everything the render delegate needs besides the scene itself.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    /// Output width in pixels.
    pub resolution_x: u32,
    /// Output height in pixels.
    pub resolution_y: u32,
    /// Frames per second.
    pub frame_rate: u32,
    /// Rendered window. Still formats only render `frames.start`.
    pub frames: FrameRange,
    /// Path tracer samples per pixel.
    pub samples: u32,
    /// Denoise the final image.
    pub denoise: bool,
    /// Motion blur shutter in frames.
    pub motion_blur_shutter: f64,
    /// Artifact location.
    pub output_path: PathBuf,
    /// Artifact encoding.
    pub format: OutputFormat,
}

impl RenderRequest {
    /// First frame that will be rendered.
    pub fn first_frame(&self) -> FrameIndex {
        self.frames.start
    }

    /// Number of frames the request produces.
    pub fn frame_count(&self) -> u64 {
        if self.format.is_still() {
            1
        } else {
            self.frames.len_frames()
        }
    }
}

/// Blocking request/response boundary to the renderer.
///
/// Implementations render `scene` as described by `request` and return once the artifact is
/// written (or the render failed).
pub trait RenderDelegate {
    /// Render one request.
    fn render(&mut self, scene: &SceneDocument, request: &RenderRequest) -> SingularityResult<()>;
}

/// Delegate that records requests and never renders; for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryDelegate {
    requests: Vec<RenderRequest>,
    scenes: Vec<SceneDocument>,
    fail_on: Option<usize>,
}

impl InMemoryDelegate {
    /// Create an empty delegate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`th call (0-based) fail with a render error.
    pub fn failing_on(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> &[RenderRequest] {
        &self.requests
    }

    /// Scene documents received so far, in call order.
    pub fn scenes(&self) -> &[SceneDocument] {
        &self.scenes
    }
}

impl RenderDelegate for InMemoryDelegate {
    fn render(&mut self, scene: &SceneDocument, request: &RenderRequest) -> SingularityResult<()> {
        let call = self.requests.len();
        self.requests.push(request.clone());
        self.scenes.push(scene.clone());
        if self.fail_on == Some(call) {
            return Err(crate::foundation::error::SingularityError::render(format!(
                "render call {call} failed"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/delegate.rs"]
mod tests;
