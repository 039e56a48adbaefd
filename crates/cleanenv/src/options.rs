//! Per-call options for [`clean_env`](crate::clean_env).

use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;

use crate::output::Draft;
use crate::reporter::{DefaultReporter, Reporter};

/// Post-processing hook run on the assembled output before it is reported
/// and frozen.
pub type Transformer = Box<dyn Fn(&mut Draft) + Send + Sync>;

/// How collected errors are surfaced.
#[derive(Default)]
pub enum Reporting {
    /// Use [`DefaultReporter`].
    #[default]
    Default,

    /// No reporter: the first missing or invalid value aborts the run.
    Throw,

    /// Hand the collected errors to a custom reporter.
    Custom(Box<dyn Reporter>),
}

impl Debug for Reporting {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::Throw => write!(f, "Throw"),
            Self::Custom(_) => write!(f, "Custom(<reporter>)"),
        }
    }
}

/// Options for a single run.
///
/// ```rust,ignore
/// let options = Options::new()
///     .strict(true)
///     .dotenv_path(".env.local")
///     .throw_on_error();
/// ```
#[must_use]
pub struct Options {
    pub(crate) dotenv_path: Option<PathBuf>,
    pub(crate) strict: bool,
    pub(crate) reporting: Reporting,
    pub(crate) transformer: Option<Transformer>,
}

impl Options {
    /// Default options: merge `.env`, non-strict, default reporter.
    pub fn new() -> Self {
        Self {
            dotenv_path: Some(PathBuf::from(".env")),
            strict: false,
            reporting: Reporting::Default,
            transformer: None,
        }
    }

    /// Merges this `.env` file instead of `./.env`.
    pub fn dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }

    /// Disables the `.env` merge.
    pub fn no_dotenv(mut self) -> Self {
        self.dotenv_path = None;
        self
    }

    /// Leaves undeclared keys out of the output and rejects them in
    /// [`CleanEnv::try_get`](crate::CleanEnv::try_get).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Fails on the first missing or invalid value instead of collecting.
    pub fn throw_on_error(mut self) -> Self {
        self.reporting = Reporting::Throw;
        self
    }

    /// Uses a custom reporter.
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporting = Reporting::Custom(Box::new(reporter));
        self
    }

    /// Sets the reporting mode directly.
    pub fn reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = reporting;
        self
    }

    /// Post-processes the assembled output before it is frozen.
    pub fn transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(&mut Draft) + Send + Sync + 'static,
    {
        self.transformer = Some(Box::new(transformer));
        self
    }

    /// Returns `true` when errors are collected rather than returned at once.
    #[must_use]
    pub const fn collects_errors(&self) -> bool {
        !matches!(self.reporting, Reporting::Throw)
    }

    pub(crate) fn reporter_ref(&self) -> Option<&dyn Reporter> {
        match &self.reporting {
            Reporting::Default => Some(&DefaultReporter),
            Reporting::Throw => None,
            Reporting::Custom(reporter) => Some(reporter.as_ref()),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Options {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("dotenv_path", &self.dotenv_path)
            .field("strict", &self.strict)
            .field("reporting", &self.reporting)
            .field("transformer", &self.transformer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
