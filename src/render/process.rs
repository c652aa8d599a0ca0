use std::ffi::OsString;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::{SingularityError, SingularityResult};
use crate::render::delegate::{RenderDelegate, RenderRequest};
use crate::render::export::SceneDocument;

/// Options for [`ProcessDelegate`].
#[derive(Clone, Debug)]
pub struct ProcessDelegateOpts {
    /// Renderer executable.
    pub program: OsString,
    /// Arguments placed before the job file path.
    pub args: Vec<OsString>,
    /// Directory job files are written to. Defaults to the output's directory.
    pub job_dir: Option<PathBuf>,
}

impl ProcessDelegateOpts {
    /// Run `program <job.json>`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            job_dir: None,
        }
    }

    /// Append an argument placed before the job path.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Write job files into `dir`.
    pub fn job_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.job_dir = Some(dir.into());
        self
    }
}

#[derive(serde::Serialize)]
struct RenderJob<'a> {
    request: &'a RenderRequest,
    scene: &'a SceneDocument,
}

/// Delegate that hands each request to an external renderer process.
///
/// Every call writes a JSON job (`{ "request": .., "scene": .. }`) next to the output, runs
/// `program args... <job>` and blocks until it exits. A non-zero exit status becomes a
/// render error carrying the process's stderr.
pub struct ProcessDelegate {
    opts: ProcessDelegateOpts,
}

impl ProcessDelegate {
    /// Create a delegate.
    pub fn new(opts: ProcessDelegateOpts) -> Self {
        Self { opts }
    }

    /// Path the job file for `request` is written to.
    pub fn job_path(&self, request: &RenderRequest) -> PathBuf {
        let stem = request
            .output_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "render".to_string());
        let dir = match &self.opts.job_dir {
            Some(dir) => dir.clone(),
            None => request
                .output_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        dir.join(format!("{stem}.job.json"))
    }

    fn write_job(
        &self,
        path: &Path,
        scene: &SceneDocument,
        request: &RenderRequest,
    ) -> SingularityResult<()> {
        ensure_parent_dir(path)?;
        let f = std::fs::File::create(path)
            .with_context(|| format!("failed to create render job '{}'", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(f), &RenderJob { request, scene })
            .map_err(|e| SingularityError::serde(format!("write render job: {e}")))
    }
}

impl RenderDelegate for ProcessDelegate {
    fn render(&mut self, scene: &SceneDocument, request: &RenderRequest) -> SingularityResult<()> {
        ensure_parent_dir(&request.output_path)?;
        let job = self.job_path(request);
        self.write_job(&job, scene, request)?;

        let program = self.opts.program.to_string_lossy().into_owned();
        tracing::info!(
            program = %program,
            job = %job.display(),
            output = %request.output_path.display(),
            frames = request.frame_count(),
            "starting renderer"
        );

        let mut cmd = Command::new(&self.opts.program);
        cmd.args(&self.opts.args)
            .arg(&job)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            SingularityError::missing_host(format!("failed to spawn renderer '{program}': {e}"))
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            SingularityError::render("failed to open renderer stderr (unexpected)")
        })?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let status = child.wait().map_err(|e| {
            SingularityError::render(format!("failed to wait for renderer to finish: {e}"))
        })?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| SingularityError::render("renderer stderr drain thread panicked"))?
            .map_err(|e| SingularityError::render(format!("renderer stderr read failed: {e}")))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(SingularityError::render(format!(
                "renderer exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        tracing::info!(output = %request.output_path.display(), "renderer finished");
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SingularityResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program --version` runs and exits successfully.
pub fn is_renderer_on_path(program: impl AsRef<std::ffi::OsStr>) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/render/process.rs"]
mod tests;
