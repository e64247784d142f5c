//! Per-invocation attempt bookkeeping.

/// Retry count and last failure of one in-flight `eventually` invocation.
///
/// Owned by exactly one invocation and discarded when it terminates.
/// `retry_count` only moves together with `last_failure`, so a non-zero
/// count always has a failure to report.
///
/// # Examples
///
/// ```rust
/// use eventually::AttemptContext;
///
/// let mut ctx = AttemptContext::new();
/// assert_eq!(ctx.retry_count(), 0);
///
/// ctx.record_failure("first");
/// ctx.record_failure("second");
/// assert_eq!(ctx.retry_count(), 2);
/// assert_eq!(ctx.last_failure(), Some(&"second"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptContext<E> {
    retry_count: u32,
    last_failure: Option<E>,
}

impl<E> AttemptContext<E> {
    /// A context with no attempts recorded.
    pub fn new() -> Self {
        Self {
            retry_count: 0,
            last_failure: None,
        }
    }

    /// Record a failed attempt, replacing the previous failure.
    pub fn record_failure(&mut self, failure: E) {
        self.retry_count = self.retry_count.saturating_add(1);
        self.last_failure = Some(failure);
    }

    /// Number of failed attempts recorded so far.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// The most recently recorded failure.
    pub fn last_failure(&self) -> Option<&E> {
        self.last_failure.as_ref()
    }

    /// Split into `(retry_count, last_failure)`.
    pub fn into_parts(self) -> (u32, Option<E>) {
        (self.retry_count, self.last_failure)
    }
}

impl<E> Default for AttemptContext<E> {
    fn default() -> Self {
        Self::new()
    }
}
