use camino::Utf8PathBuf;
use hcpguard_domain::Format;
use hcpguard_types::{FailureKind, FileFailure, SourceLocation, TargetPath};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No parser recognized the input, or the root is not a map.
    #[error("unsupported format: {reason}")]
    UnsupportedFormat { reason: String },

    #[error("{}{}: {message}", subject(.format), at(.location))]
    Parse {
        format: Option<Format>,
        message: String,
        location: Option<SourceLocation>,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn subject(format: &Option<Format>) -> String {
    match format {
        Some(f) => format!("invalid {f}"),
        None => "invalid input".to_string(),
    }
}

fn at(location: &Option<SourceLocation>) -> String {
    location.map(|l| format!(" at {l}")).unwrap_or_default()
}

impl LoadError {
    pub(crate) fn parse(
        format: Format,
        message: impl Into<String>,
        location: Option<SourceLocation>,
    ) -> Self {
        LoadError::Parse {
            format: Some(format),
            message: message.into(),
            location,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            LoadError::UnsupportedFormat { .. } => FailureKind::UnsupportedFormat,
            LoadError::Parse { .. } => FailureKind::Parse,
            LoadError::Io { .. } => FailureKind::Io,
        }
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            LoadError::Parse { location, .. } => *location,
            _ => None,
        }
    }

    /// Report row for a file that could not be loaded.
    pub fn into_failure(self, target: TargetPath) -> FileFailure {
        FileFailure {
            target,
            kind: self.kind(),
            location: self.location(),
            message: self.to_string(),
        }
    }
}

/// 1-based line and column for a byte offset in `source`.
pub(crate) fn line_col(source: &str, offset: usize) -> SourceLocation {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    SourceLocation {
        line: Some(line as u32),
        column: Some(column as u32),
        offset: Some(offset),
    }
}
