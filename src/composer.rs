//! Top-level scene build and render orchestration.

use std::path::{Path, PathBuf};

use crate::assets::discover::collect_images;
use crate::bodies::{CelestialBodies, CelestialBodyFactory};
use crate::camera::{CameraOrbitAnimator, CameraRig};
use crate::foundation::error::{SingularityError, SingularityResult};
use crate::ingest::{AssetIngestionPipeline, IngestedAsset};
use crate::material::builder::{MaterialGraphBuilder, MaterialKind};
use crate::material::registry::MaterialId;
use crate::render::delegate::{MOTION_BLUR_SHUTTER, OutputFormat, RenderDelegate, RenderRequest};
use crate::render::export::SceneDocument;
use crate::scene::context::SceneContext;
use crate::settings::{SceneConfig, SceneSettings};

/// Name of the world background material.
pub const WORLD_MATERIAL: &str = "BlackholeWorld";

/// Handles to everything a build created.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltScene {
    /// World background material.
    pub world: MaterialId,
    /// Black hole bodies.
    pub bodies: CelestialBodies,
    /// Camera rig.
    pub camera: CameraRig,
    /// Ingested planes, in asset order. Empty when there were no assets.
    pub assets: Vec<IngestedAsset>,
}

/// Builds the full scene from settings and hands it to a render delegate.
pub struct SceneComposer {
    settings: SceneSettings,
    output_path: PathBuf,
    preview_path: Option<PathBuf>,
    assets: Vec<PathBuf>,
    ingestion: AssetIngestionPipeline,
}

impl SceneComposer {
    /// Composer for explicit settings and assets, without a preview.
    pub fn new(
        settings: SceneSettings,
        output_path: impl Into<PathBuf>,
        assets: Vec<PathBuf>,
    ) -> SingularityResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            output_path: output_path.into(),
            preview_path: None,
            assets,
            ingestion: AssetIngestionPipeline::new(),
        })
    }

    /// Composer for a loaded config: resolves output paths and scans its image directory.
    pub fn from_config(config: &SceneConfig) -> SingularityResult<Self> {
        let assets = collect_images(&config.images_dir);
        if assets.is_empty() {
            tracing::info!(dir = %config.images_dir.display(), "no images to ingest");
        }
        Ok(Self::new(config.settings.clone(), config.output_path(), assets)?
            .with_preview(config.preview_path()))
    }

    /// Set (or clear) the preview still path.
    pub fn with_preview(mut self, path: Option<PathBuf>) -> Self {
        self.preview_path = path;
        self
    }

    /// Seed placeholder colors for reproducible builds.
    pub fn with_placeholder_seed(mut self, seed: u64) -> Self {
        self.ingestion = AssetIngestionPipeline::with_seed(seed);
        self
    }

    /// Settings the composer builds from.
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Assets that will be ingested.
    pub fn assets(&self) -> &[PathBuf] {
        &self.assets
    }

    /// Preview still path, if any.
    pub fn preview_path(&self) -> Option<&Path> {
        self.preview_path.as_deref()
    }

    /// Tear `ctx` down and rebuild the whole scene.
    ///
    /// Order is fixed: render target, world, bodies, camera rig, then ingestion when there are
    /// assets.
    #[tracing::instrument(skip_all, fields(assets = self.assets.len()))]
    pub fn build(&mut self, ctx: &mut SceneContext) -> SingularityResult<BuiltScene> {
        ctx.clear();
        let frames = self.settings.frame_range()?;
        let bh = &self.settings.blackhole;
        let r = &self.settings.render;

        ctx.set_render_target(RenderRequest {
            resolution_x: r.resolution_x,
            resolution_y: r.resolution_y,
            frame_rate: r.frame_rate,
            frames,
            samples: r.samples,
            denoise: true,
            motion_blur_shutter: MOTION_BLUR_SHUTTER,
            output_path: self.output_path.clone(),
            format: OutputFormat::VIDEO,
        });

        let world = MaterialGraphBuilder::build(
            &mut ctx.materials,
            WORLD_MATERIAL,
            &MaterialKind::WorldBackground,
            bh,
        )?;
        ctx.set_world(world);

        let bodies = CelestialBodyFactory::build(ctx, bh)?;
        let camera = CameraOrbitAnimator::build(ctx, &self.settings.camera, bh.radius, frames)?;
        let assets = if self.assets.is_empty() {
            Vec::new()
        } else {
            self.ingestion.ingest(ctx, &self.assets, bh, frames)?
        };

        tracing::info!(
            objects = ctx.objects().len(),
            materials = ctx.materials().len(),
            "scene built"
        );
        Ok(BuiltScene {
            world,
            bodies,
            camera,
            assets,
        })
    }

    /// Render the animation, then the preview still when one is configured.
    pub fn render(
        &self,
        ctx: &mut SceneContext,
        delegate: &mut dyn RenderDelegate,
    ) -> SingularityResult<()> {
        let request = ctx
            .render_target()
            .cloned()
            .ok_or_else(|| SingularityError::render("scene has no render target; build it first"))?;
        delegate.render(&SceneDocument::capture(ctx), &request)?;

        if let Some(path) = self.preview_path.clone() {
            self.preview(ctx, delegate, &path)?;
        }
        Ok(())
    }

    /// Render one PNG still of the first frame to `path`.
    ///
    /// The scene's output format and path are switched for the call and restored afterwards,
    /// whether or not the render succeeded.
    pub fn preview(
        &self,
        ctx: &mut SceneContext,
        delegate: &mut dyn RenderDelegate,
        path: &Path,
    ) -> SingularityResult<()> {
        let target = ctx
            .render_target_mut()
            .ok_or_else(|| SingularityError::render("scene has no render target; build it first"))?;
        let saved_format = std::mem::replace(&mut target.format, OutputFormat::PNG_STILL);
        let saved_path = std::mem::replace(&mut target.output_path, path.to_path_buf());
        let request = target.clone();

        tracing::info!(
            path = %path.display(),
            frame = request.first_frame().0,
            "rendering preview"
        );
        let result = delegate.render(&SceneDocument::capture(ctx), &request);

        if let Some(target) = ctx.render_target_mut() {
            target.format = saved_format;
            target.output_path = saved_path;
        }
        result
    }
}

#[cfg(test)]
#[path = "../tests/unit/composer.rs"]
mod tests;
