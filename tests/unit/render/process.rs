use super::*;
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::render::delegate::OutputFormat;
use crate::scene::context::SceneContext;

fn request(out: PathBuf) -> RenderRequest {
    RenderRequest {
        resolution_x: 64,
        resolution_y: 36,
        frame_rate: 30,
        frames: FrameRange::new(FrameIndex(1), FrameIndex(10)).unwrap(),
        samples: 4,
        denoise: true,
        motion_blur_shutter: 0.5,
        output_path: out,
        format: OutputFormat::VIDEO,
    }
}

#[test]
fn job_path_sits_next_to_the_output() {
    let d = ProcessDelegate::new(ProcessDelegateOpts::new("renderer"));
    let r = request(PathBuf::from("/tmp/out/anim.mp4"));
    assert_eq!(d.job_path(&r), PathBuf::from("/tmp/out/anim.mp4.job.json"));

    let d = ProcessDelegate::new(ProcessDelegateOpts::new("renderer").job_dir("/jobs"));
    assert_eq!(d.job_path(&r), PathBuf::from("/jobs/anim.mp4.job.json"));
}

#[test]
fn ensure_parent_dir_tolerates_bare_file_names() {
    ensure_parent_dir(Path::new("file.json")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a/b/c.mp4");
    ensure_parent_dir(&nested).unwrap();
    assert!(dir.path().join("a/b").is_dir());
}

#[test]
fn unknown_program_is_not_on_path() {
    assert!(!is_renderer_on_path("singularity-no-such-renderer-xyz"));
}

#[test]
fn spawn_failure_is_a_missing_host() {
    let dir = tempfile::tempdir().unwrap();
    let mut d = ProcessDelegate::new(ProcessDelegateOpts::new("singularity-no-such-renderer-xyz"));
    let doc = SceneDocument::capture(&SceneContext::new());
    let err = d
        .render(&doc, &request(dir.path().join("anim.mp4")))
        .unwrap_err();
    assert!(matches!(err, SingularityError::MissingHostRuntime(_)));
}

#[cfg(unix)]
#[test]
fn renderer_receives_the_job_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out/anim.mp4");
    let opts = ProcessDelegateOpts::new("sh")
        .arg("-c")
        .arg(r#"cp "$0" "$0.seen""#);
    let mut d = ProcessDelegate::new(opts);
    let doc = SceneDocument::capture(&SceneContext::new());
    let req = request(out.clone());
    d.render(&doc, &req).unwrap();

    let seen = d.job_path(&req).with_extension("json.seen");
    let job: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(seen).unwrap()).unwrap();
    assert_eq!(job["request"]["samples"], 4);
    assert_eq!(job["scene"]["version"], "1");
    assert!(dir.path().join("out").is_dir());
}

#[cfg(unix)]
#[test]
fn non_zero_exit_carries_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let opts = ProcessDelegateOpts::new("sh")
        .arg("-c")
        .arg("echo 'scene exploded' >&2; exit 3");
    let mut d = ProcessDelegate::new(opts);
    let doc = SceneDocument::capture(&SceneContext::new());
    let err = d
        .render(&doc, &request(dir.path().join("anim.mp4")))
        .unwrap_err();
    match err {
        SingularityError::Render(msg) => assert!(msg.contains("scene exploded"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}
