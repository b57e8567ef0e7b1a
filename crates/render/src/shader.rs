//! Shader program construction: read two source files, compile a vertex and
//! a fragment stage, link them into one program.
//!
//! Building is fail-open. Unreadable files, compile errors and link errors are
//! collected as diagnostics and a program handle is always produced, even if
//! it will not render anything. Callers that want hard failures use
//! [`ShaderProgramBuilder::build_strict`] or [`ProgramBuild::into_result`].

use std::fmt;
use std::path::{Path, PathBuf};

/// Upper bound on the size of a single compile or link log, in bytes.
pub const MAX_LOG_LEN: usize = 1024;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from shader program construction.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
}

/// Which step of the build a diagnostic came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    Io { stage: ShaderStage, path: PathBuf },
    Compile(ShaderStage),
    Link,
}

/// One problem reported while building a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::Io { stage, path } => {
                write!(f, "{stage} source {}: {}", path.display(), self.message)
            }
            DiagnosticKind::Compile(stage) => {
                write!(f, "{stage} compilation error:\n{}", self.message)
            }
            DiagnosticKind::Link => write!(f, "link error:\n{}", self.message),
        }
    }
}

impl From<ShaderDiagnostic> for ShaderError {
    fn from(diag: ShaderDiagnostic) -> Self {
        match diag.kind {
            DiagnosticKind::Io { path, .. } => Self::Io {
                path,
                source: std::io::Error::other(diag.message),
            },
            DiagnosticKind::Compile(stage) => Self::Compile {
                stage,
                log: diag.message,
            },
            DiagnosticKind::Link => Self::Link { log: diag.message },
        }
    }
}

/// Read a shader source file in full. Every line, including the last, ends
/// in a single `\n`; `\r\n` endings are normalized.
pub fn load_source(path: impl AsRef<Path>) -> Result<String, ShaderError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut source = String::with_capacity(raw.len() + 1);
    for line in raw.lines() {
        source.push_str(line);
        source.push('\n');
    }
    Ok(source)
}

/// Result of compiling one stage: the handle plus the driver log on failure.
#[derive(Debug)]
pub struct StageOutput<S> {
    pub stage: S,
    pub log: Option<String>,
}

/// Result of linking: the program handle plus the link log on failure.
#[derive(Debug)]
pub struct LinkOutput<P> {
    pub program: P,
    pub log: Option<String>,
}

/// The graphics-API side of program building.
///
/// Implementations must return a handle even when compilation or linking
/// fails; the log carries the reason.
pub trait ShaderBackend {
    /// A compiled stage. Dropped by the builder once the program is linked.
    type Stage;
    /// A linked program.
    type Program;

    fn compile_stage(
        &mut self,
        stage: ShaderStage,
        label: &str,
        source: &str,
    ) -> StageOutput<Self::Stage>;

    /// Attach `vertex` then `fragment` and link them.
    fn link_program(
        &mut self,
        label: &str,
        vertex: &Self::Stage,
        fragment: &Self::Stage,
    ) -> LinkOutput<Self::Program>;
}

/// A program handle and everything that went wrong producing it.
#[derive(Debug)]
pub struct ProgramBuild<P> {
    pub program: P,
    pub diagnostics: Vec<ShaderDiagnostic>,
}

impl<P> ProgramBuild<P> {
    /// No IO, compile or link problems were reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Treat the first diagnostic, if any, as an error.
    pub fn into_result(self) -> Result<P, ShaderError> {
        match self.diagnostics.into_iter().next() {
            Some(diag) => Err(diag.into()),
            None => Ok(self.program),
        }
    }
}

/// Builds one program from a vertex and a fragment source file.
#[derive(Debug, Clone)]
pub struct ShaderProgramBuilder {
    vertex_path: PathBuf,
    fragment_path: PathBuf,
    label: String,
}

impl ShaderProgramBuilder {
    pub fn new(vertex_path: impl Into<PathBuf>, fragment_path: impl Into<PathBuf>) -> Self {
        Self {
            vertex_path: vertex_path.into(),
            fragment_path: fragment_path.into(),
            label: "shader_program".into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Fail-open build. An unreadable file compiles as empty source.
    pub fn build<B: ShaderBackend>(&self, backend: &mut B) -> ProgramBuild<B::Program> {
        let mut diagnostics = Vec::new();
        let vertex = read_or_record(ShaderStage::Vertex, &self.vertex_path, &mut diagnostics);
        let fragment =
            read_or_record(ShaderStage::Fragment, &self.fragment_path, &mut diagnostics);
        self.compile_and_link(backend, &vertex, &fragment, diagnostics)
    }

    /// Build that refuses unreadable files up front and any later diagnostic.
    pub fn build_strict<B: ShaderBackend>(
        &self,
        backend: &mut B,
    ) -> Result<B::Program, ShaderError> {
        let vertex = load_source(&self.vertex_path)?;
        let fragment = load_source(&self.fragment_path)?;
        self.compile_and_link(backend, &vertex, &fragment, Vec::new())
            .into_result()
    }

    /// Build from in-memory sources, skipping the file reads.
    pub fn build_from_sources<B: ShaderBackend>(
        &self,
        backend: &mut B,
        vertex_source: &str,
        fragment_source: &str,
    ) -> ProgramBuild<B::Program> {
        self.compile_and_link(backend, vertex_source, fragment_source, Vec::new())
    }

    fn compile_and_link<B: ShaderBackend>(
        &self,
        backend: &mut B,
        vertex_source: &str,
        fragment_source: &str,
        mut diagnostics: Vec<ShaderDiagnostic>,
    ) -> ProgramBuild<B::Program> {
        let vertex = self.compile(backend, ShaderStage::Vertex, vertex_source, &mut diagnostics);
        let fragment =
            self.compile(backend, ShaderStage::Fragment, fragment_source, &mut diagnostics);

        let linked = backend.link_program(&self.label, &vertex, &fragment);
        if let Some(log) = linked.log {
            let message = bounded_log(log);
            tracing::warn!(program = %self.label, "shader linking error:\n{message}");
            diagnostics.push(ShaderDiagnostic {
                kind: DiagnosticKind::Link,
                message,
            });
        }

        // Stages are build artifacts; the linked program does not keep them.
        drop(vertex);
        drop(fragment);

        if diagnostics.is_empty() {
            tracing::info!(program = %self.label, "shader program built");
        } else {
            tracing::warn!(
                program = %self.label,
                problems = diagnostics.len(),
                "shader program built with diagnostics"
            );
        }

        ProgramBuild {
            program: linked.program,
            diagnostics,
        }
    }

    fn compile<B: ShaderBackend>(
        &self,
        backend: &mut B,
        stage: ShaderStage,
        source: &str,
        diagnostics: &mut Vec<ShaderDiagnostic>,
    ) -> B::Stage {
        let label = format!("{}_{stage}", self.label);
        tracing::debug!(%stage, bytes = source.len(), "compiling shader stage");
        let output = backend.compile_stage(stage, &label, source);
        if let Some(log) = output.log {
            let message = bounded_log(log);
            tracing::warn!(%stage, "shader module compilation error:\n{message}");
            diagnostics.push(ShaderDiagnostic {
                kind: DiagnosticKind::Compile(stage),
                message,
            });
        }
        output.stage
    }
}

fn read_or_record(
    stage: ShaderStage,
    path: &Path,
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> String {
    load_source(path).unwrap_or_else(|err| {
        let message = match err {
            ShaderError::Io { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        tracing::warn!(%stage, path = %path.display(), "cannot read shader source: {message}");
        diagnostics.push(ShaderDiagnostic {
            kind: DiagnosticKind::Io {
                stage,
                path: path.to_path_buf(),
            },
            message,
        });
        String::new()
    })
}

/// Clamp a log to `MAX_LOG_LEN` bytes without splitting a character.
/// An empty log still needs to say something.
fn bounded_log(mut log: String) -> String {
    if log.trim().is_empty() {
        return "(no diagnostic output)".into();
    }
    if log.len() > MAX_LOG_LEN {
        let mut end = MAX_LOG_LEN;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Records every call and fails on sources containing "ERROR".
    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<String>,
        fail_link: bool,
    }

    impl ShaderBackend for RecordingBackend {
        type Stage = (ShaderStage, String);
        type Program = Vec<ShaderStage>;

        fn compile_stage(
            &mut self,
            stage: ShaderStage,
            label: &str,
            source: &str,
        ) -> StageOutput<Self::Stage> {
            self.calls.push(format!("compile {label}"));
            let log = source.contains("ERROR").then(|| format!("bad {stage}"));
            StageOutput {
                stage: (stage, source.to_string()),
                log,
            }
        }

        fn link_program(
            &mut self,
            label: &str,
            vertex: &Self::Stage,
            fragment: &Self::Stage,
        ) -> LinkOutput<Self::Program> {
            self.calls.push(format!("link {label}"));
            LinkOutput {
                program: vec![vertex.0, fragment.0],
                log: self.fail_link.then(|| "link failed".to_string()),
            }
        }
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_source_normalizes_newlines() {
        let file = write_temp("a\r\nb\nc");
        assert_eq!(load_source(file.path()).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn load_source_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_source(dir.path().join("missing.wgsl")).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }

    #[test]
    fn clean_build_compiles_vertex_then_fragment_then_links() {
        let vs = write_temp("vertex");
        let fs = write_temp("fragment");
        let mut backend = RecordingBackend::default();
        let build = ShaderProgramBuilder::new(vs.path(), fs.path())
            .with_label("cube")
            .build(&mut backend);

        assert!(build.is_clean());
        assert_eq!(build.program, vec![ShaderStage::Vertex, ShaderStage::Fragment]);
        assert_eq!(
            backend.calls,
            vec!["compile cube_vertex", "compile cube_fragment", "link cube"]
        );
    }

    #[test]
    fn compile_error_is_reported_and_build_continues() {
        let vs = write_temp("ERROR");
        let fs = write_temp("fragment");
        let mut backend = RecordingBackend::default();
        let build = ShaderProgramBuilder::new(vs.path(), fs.path()).build(&mut backend);

        assert_eq!(build.diagnostics.len(), 1);
        assert_eq!(
            build.diagnostics[0].kind,
            DiagnosticKind::Compile(ShaderStage::Vertex)
        );
        assert_eq!(build.program.len(), 2);
        assert!(backend.calls.iter().any(|c| c.starts_with("link")));
    }

    #[test]
    fn link_error_still_returns_program() {
        let vs = write_temp("vertex");
        let fs = write_temp("fragment");
        let mut backend = RecordingBackend {
            fail_link: true,
            ..Default::default()
        };
        let build = ShaderProgramBuilder::new(vs.path(), fs.path()).build(&mut backend);
        assert_eq!(build.diagnostics.len(), 1);
        assert_eq!(build.diagnostics[0].kind, DiagnosticKind::Link);
        assert!(matches!(build.into_result(), Err(ShaderError::Link { .. })));
    }

    #[test]
    fn unreadable_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let fs = write_temp("fragment");
        let mut backend = RecordingBackend::default();
        let build = ShaderProgramBuilder::new(dir.path().join("nope.wgsl"), fs.path())
            .build(&mut backend);

        assert!(matches!(
            build.diagnostics[0].kind,
            DiagnosticKind::Io {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert_eq!(backend.calls.len(), 3);
        assert!(matches!(build.into_result(), Err(ShaderError::Io { .. })));
    }

    #[test]
    fn strict_build_stops_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        let fs = write_temp("fragment");
        let mut backend = RecordingBackend::default();
        let result = ShaderProgramBuilder::new(dir.path().join("nope.wgsl"), fs.path())
            .build_strict(&mut backend);

        assert!(matches!(result, Err(ShaderError::Io { .. })));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn logs_are_bounded_on_char_boundary() {
        let long = "é".repeat(MAX_LOG_LEN);
        let bounded = bounded_log(long);
        assert!(bounded.len() <= MAX_LOG_LEN);
        assert!(bounded.chars().all(|c| c == 'é'));
        assert_eq!(bounded_log(String::new()), "(no diagnostic output)");
    }

    #[test]
    fn diagnostic_display_names_stage() {
        let diag = ShaderDiagnostic {
            kind: DiagnosticKind::Compile(ShaderStage::Fragment),
            message: "oops".into(),
        };
        assert_eq!(diag.to_string(), "fragment compilation error:\noops");
    }
}
