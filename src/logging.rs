use std::fmt;

/// Request-scoped logging handle.
///
/// Obtained from [`RequestContext::log`](crate::RequestContext::log) and
/// bound to the context's lifetime. Every event carries the request id.
/// Guest identifiers and content bodies are never passed to it.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
}

impl<'a> RequestLog<'a> {
    /// Creates a handle for one request.
    ///
    /// This is `pub(crate)` - only `RequestContext` creates it.
    pub(crate) fn new(request_id: &'a str) -> Self {
        Self { request_id }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs an info-level message with request ID.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a warning-level message with request ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, "{}", args);
    }

    /// Logs an error-level message with request ID.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, "{}", args);
    }

    /// Logs a debug-level message with request ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, "{}", args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_copy_and_keeps_request_id() {
        let log = RequestLog::new("req-log");
        let copy = log;

        assert_eq!(log.request_id(), "req-log");
        assert_eq!(copy.request_id(), "req-log");
    }

    #[test]
    fn logging_without_subscriber_is_a_no_op() {
        let log = RequestLog::new("req-quiet");

        log.debug(format_args!("debug {}", 1));
        log.info(format_args!("info"));
        log.warn(format_args!("warn"));
        log.error(format_args!("error"));
    }
}
