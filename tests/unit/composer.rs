use super::*;
use crate::bodies::BLACK_HOLE_COLLECTION;
use crate::camera::CAMERA_COLLECTION;
use crate::foundation::core::FrameIndex;
use crate::ingest::{INGEST_COLLECTION, INGEST_PATH};
use crate::material::graph::GraphDomain;
use crate::render::delegate::InMemoryDelegate;

fn composer(assets: Vec<PathBuf>) -> SceneComposer {
    SceneComposer::new(SceneSettings::default(), "/tmp/singularity/anim.mp4", assets)
        .unwrap()
        .with_placeholder_seed(11)
}

#[test]
fn build_without_assets_skips_ingestion() {
    let mut ctx = SceneContext::new();
    let built = composer(Vec::new()).build(&mut ctx).unwrap();

    assert!(built.assets.is_empty());
    assert!(ctx.objects().id_for(INGEST_PATH).is_none());
    assert!(ctx.collection(INGEST_COLLECTION).is_none());
    let names: Vec<_> = ctx.collections().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, [BLACK_HOLE_COLLECTION, CAMERA_COLLECTION]);
}

#[test]
fn build_configures_world_camera_and_target() {
    let mut ctx = SceneContext::new();
    let built = composer(Vec::new()).build(&mut ctx).unwrap();

    assert_eq!(ctx.world(), Some(built.world));
    assert_eq!(
        ctx.materials().get(built.world).unwrap().domain(),
        GraphDomain::World
    );
    assert_eq!(ctx.active_camera(), Some(built.camera.camera));

    let target = ctx.render_target().unwrap();
    assert_eq!((target.resolution_x, target.resolution_y), (3840, 2160));
    assert_eq!(target.frames.start, FrameIndex(1));
    assert_eq!(target.frames.end, FrameIndex(450));
    assert_eq!(target.samples, 1024);
    assert_eq!(target.format, OutputFormat::VIDEO);
    assert_eq!(target.motion_blur_shutter, 0.5);
    assert_eq!(target.output_path, PathBuf::from("/tmp/singularity/anim.mp4"));
}

#[test]
fn rebuild_starts_from_a_clean_scene() {
    let mut ctx = SceneContext::new();
    let mut c = composer(vec![PathBuf::from("/nope/a.png")]);
    c.build(&mut ctx).unwrap();
    let objects = ctx.objects().len();
    let materials = ctx.materials().len();
    c.build(&mut ctx).unwrap();
    assert_eq!(ctx.objects().len(), objects);
    assert_eq!(ctx.materials().len(), materials);
}

#[test]
fn render_sends_video_then_preview() {
    let mut ctx = SceneContext::new();
    let mut c = composer(Vec::new()).with_preview(Some(PathBuf::from("/tmp/p.png")));
    c.build(&mut ctx).unwrap();

    let mut d = InMemoryDelegate::new();
    c.render(&mut ctx, &mut d).unwrap();

    let reqs = d.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].format, OutputFormat::VIDEO);
    assert_eq!(reqs[1].format, OutputFormat::PNG_STILL);
    assert_eq!(reqs[1].output_path, PathBuf::from("/tmp/p.png"));
    assert_eq!(reqs[1].first_frame(), FrameIndex(1));
    assert_eq!(d.scenes()[1].render.as_ref().unwrap(), &reqs[1]);

    let target = ctx.render_target().unwrap();
    assert_eq!(target.format, OutputFormat::VIDEO);
    assert_eq!(target.output_path, PathBuf::from("/tmp/singularity/anim.mp4"));
}

#[test]
fn preview_restores_target_even_on_failure() {
    let mut ctx = SceneContext::new();
    let mut c = composer(Vec::new());
    c.build(&mut ctx).unwrap();
    let before = ctx.render_target().unwrap().clone();

    let mut d = InMemoryDelegate::new().failing_on(0);
    let err = c
        .preview(&mut ctx, &mut d, Path::new("/tmp/p.png"))
        .unwrap_err();
    assert!(matches!(err, SingularityError::Render(_)));
    assert_eq!(d.requests()[0].format, OutputFormat::PNG_STILL);
    assert_eq!(ctx.render_target().unwrap(), &before);
}

#[test]
fn render_before_build_is_an_error() {
    let mut ctx = SceneContext::new();
    let c = composer(Vec::new());
    let mut d = InMemoryDelegate::new();
    assert!(c.render(&mut ctx, &mut d).is_err());
    assert!(c.preview(&mut ctx, &mut d, Path::new("/tmp/p.png")).is_err());
    assert!(d.requests().is_empty());
}

#[test]
fn invalid_settings_are_rejected_up_front() {
    let mut settings = SceneSettings::default();
    settings.render.frame_end = settings.render.frame_start;
    assert!(matches!(
        SceneComposer::new(settings, "out.mp4", Vec::new()),
        Err(SingularityError::Validation(_))
    ));
}
