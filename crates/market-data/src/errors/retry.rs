/// Classification for retry policy.
///
/// Used by the provider registry to decide whether a failed quote request is
/// worth a second attempt.
///
/// | Class | Retried? |
/// |-------|----------|
/// | `Never` | No |
/// | `Transient` | Once, after the provider's retry delay |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, malformed payload, or terminal failure.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry a single time.
    ///
    /// Used for rate limiting (429), timeouts and upstream 5xx responses.
    Transient,
}
