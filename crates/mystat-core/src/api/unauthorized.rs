//! Strategies for reacting to a `401 Unauthorized` response.

/// What the dispatcher should do after a handler saw a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedAction {
    /// Refresh the token and send the request once more.
    Retry,
    /// The caller took over; the request yields no result and no error.
    Handled,
}

/// Invoked synchronously with the request path whenever a request is rejected with 401.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self, path: &str) -> UnauthorizedAction;
}

/// Default handler: does nothing and lets the dispatcher refresh and retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryWithRefresh;

impl UnauthorizedHandler for RetryWithRefresh {
    fn on_unauthorized(&self, _path: &str) -> UnauthorizedAction {
        UnauthorizedAction::Retry
    }
}

/// Wraps a caller callback. The callback always counts as handling the 401.
pub struct CallbackHandler<F> {
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(&str) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> UnauthorizedHandler for CallbackHandler<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn on_unauthorized(&self, path: &str) -> UnauthorizedAction {
        (self.callback)(path);
        UnauthorizedAction::Handled
    }
}
