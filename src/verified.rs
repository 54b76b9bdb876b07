/// A request input that passed a [`Sanitizer`](crate::Sanitizer).
///
/// `Verified<T>` has no public constructor: it only comes out of a sanitizer,
/// so holding one proves the value went through validation. Access is
/// explicit through [`AsRef`] or [`into_inner`](Self::into_inner).
///
/// ```compile_fail
/// use content_exposure::Verified;
///
/// let forged = Verified::new_unchecked("guest".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Wraps a value without validating it.
    ///
    /// Callers must have validated `value` already; sanitizers are the only
    /// intended callers.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper and returns the value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
