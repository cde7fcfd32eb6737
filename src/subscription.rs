use std::fmt;

/// Unsubscribe token returned by every [`Surface`](crate::Surface) registration.
///
/// The teardown action runs exactly once: on [`cancel`](Self::cancel) or,
/// failing that, when the token is dropped. Holding tokens in a collection
/// therefore releases every registration on all exit paths, including an
/// unwind in the middle of setup.
#[must_use = "dropping a Subscription immediately removes the registration"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps a teardown action.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Runs the teardown action now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.teardown.is_some())
            .finish()
    }
}
