//! Error reporting.
//!
//! After every key has been processed the collected errors are handed to a
//! [`Reporter`] exactly once, together with the assembled output. The
//! reporter decides what happens next: returning `Err` aborts the run,
//! returning `Ok` lets the frozen environment through with the failing keys
//! left out.

use std::collections::BTreeMap;

use tracing::error;

use crate::error::Error;
use crate::output::Draft;

/// Everything a reporter gets to see.
#[derive(Debug)]
pub struct ErrorReport<'a> {
    /// Collected per-key errors. Empty on a clean run.
    pub errors: BTreeMap<String, Error>,

    /// The assembled output, after the transformer ran.
    pub env: &'a Draft,
}

impl ErrorReport<'_> {
    /// Returns `true` if no key failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decides the fate of a run with collected errors.
///
/// Closures with the matching signature are reporters too:
///
/// ```rust,ignore
/// let options = Options::new().reporter(|report: ErrorReport<'_>| {
///     for (key, err) in &report.errors {
///         eprintln!("{key}: {err}");
///     }
///     Ok(())
/// });
/// ```
pub trait Reporter: Send + Sync {
    /// Handles the report.
    ///
    /// # Errors
    ///
    /// Returns the error the run should fail with.
    fn report(&self, report: ErrorReport<'_>) -> Result<(), Error>;
}

impl<F> Reporter for F
where
    F: Fn(ErrorReport<'_>) -> Result<(), Error> + Send + Sync,
{
    fn report(&self, report: ErrorReport<'_>) -> Result<(), Error> {
        self(report)
    }
}

/// Logs every error and fails the run with all of them.
///
/// Pretty-print the returned error with `miette::Report` for the familiar
/// grouped output.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultReporter;

impl Reporter for DefaultReporter {
    fn report(&self, report: ErrorReport<'_>) -> Result<(), Error> {
        for (key, err) in &report.errors {
            error!(key = %key, error = %err, "invalid environment variable");
        }

        Error::multiple(report.errors.into_values().collect()).map_or(Ok(()), Err)
    }
}
