/// Classification of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// The currently displayed or targeted directory path.
    Breadcrumb,
    /// A user-visible failure.
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Breadcrumb => "breadcrumb",
            StatusKind::Error => "error",
        }
    }
}

/// One message for the status line.
///
/// Plain progress messages have no kind; `progress` is a fraction where
/// values `>= 1.0` mean complete.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub message: String,
    pub kind: Option<StatusKind>,
    pub progress: Option<f64>,
}

impl StatusEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            progress: None,
        }
    }

    pub fn breadcrumb(path: impl Into<String>) -> Self {
        Self {
            message: path.into(),
            kind: Some(StatusKind::Breadcrumb),
            progress: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: Some(StatusKind::Error),
            progress: None,
        }
    }

    pub fn progress(message: impl Into<String>, fraction: f64) -> Self {
        Self {
            message: message.into(),
            kind: None,
            progress: Some(fraction),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == Some(StatusKind::Error)
    }

    /// Progress clamped to `0..=100` for display, if any.
    pub fn percent(&self) -> Option<f64> {
        self.progress
            .filter(|p| *p > 0.0)
            .map(|p| (p * 100.0).min(100.0))
    }
}

/// Receiver of status-line messages.
///
/// Implemented by the front-end; closures taking a [`StatusEvent`] work too.
pub trait StatusSink: Send + Sync {
    fn log(&self, event: StatusEvent);
}

impl<F> StatusSink for F
where
    F: Fn(StatusEvent) + Send + Sync,
{
    fn log(&self, event: StatusEvent) {
        self(event)
    }
}

/// Fraction of `total` covered by `done`; an empty total counts as complete.
pub fn progress_fraction(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    done as f64 / total as f64
}
