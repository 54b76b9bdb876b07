use std::fmt;

/// A request input that has not been validated yet.
///
/// Every value lifted off an incoming request (query, body and path
/// parameters, headers) is wrapped in `Tainted<T>` at the web boundary.
/// Callers get the value back through a [`Sanitizer`](crate::Sanitizer),
/// which yields a [`Verified<T>`](crate::Verified).
///
/// # Security Properties
///
/// - No `Deref`, `AsRef` or conversion traits
/// - The inner value is reachable only from validation code in this crate
/// - `Debug` never prints the inner value
///
/// # Examples
///
/// ```
/// use content_exposure::Tainted;
///
/// let guest = Tainted::new("guest-42".to_string());
/// assert_eq!(format!("{:?}", guest), "Tainted(..)");
/// ```
// Do NOT remove Clone: the same input may feed several sanitizers.
#[derive(Clone)]
pub struct Tainted<T> {
    // Must stay private. A public field bypasses sanitization entirely.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Releases the inner value to a sanitizer.
    ///
    /// Only validation code in this crate calls it: sanitizers, and parsers
    /// that map the value onto a closed set.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }
}

// Do NOT add Deref, AsRef, Borrow, From<T> or Into<T> here.

impl<T> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tainted(..)")
    }
}
