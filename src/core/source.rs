/// Data-source seam between the collector and the OS / Docker query layers

use std::future::Future;

use crate::core::error::SourceError;
use crate::core::sample::{Sample, Subject};

/// A kind of subject that can be listed and sampled one by one.
///
/// `enumerate` failing is fatal for the tick; `fetch` failing only zeroes that
/// subject's sample.
pub trait SubjectSource: Send + Sync {
    /// Current subjects, in source order
    fn enumerate(&self) -> impl Future<Output = Result<Vec<Subject>, SourceError>> + Send;

    /// Measurements for one subject
    fn fetch(&self, subject: &Subject) -> impl Future<Output = Result<Sample, SourceError>> + Send;
}

impl<S: SubjectSource + ?Sized> SubjectSource for std::sync::Arc<S> {
    fn enumerate(&self) -> impl Future<Output = Result<Vec<Subject>, SourceError>> + Send {
        (**self).enumerate()
    }

    fn fetch(&self, subject: &Subject) -> impl Future<Output = Result<Sample, SourceError>> + Send {
        (**self).fetch(subject)
    }
}
