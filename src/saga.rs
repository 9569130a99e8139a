use std::future::Future;

use futures_util::future::BoxFuture;

/// Reverse-order compensation stack for multi-step provisioning flows.
///
/// Each step that succeeds registers a compensation with [`Saga::on_abort`].
/// If a later step fails, [`Saga::abort`] runs the registered compensations
/// newest-first. Compensation failures are logged and not retried, so a
/// failed cleanup can leave orphans behind; that is accepted, best-effort
/// behavior. [`Saga::commit`] discards the stack once the whole flow is done.
pub struct Saga {
    label: &'static str,
    compensations: Vec<(&'static str, BoxFuture<'static, Result<(), String>>)>,
}

impl Saga {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            compensations: Vec::new(),
        }
    }

    /// Register a compensation for a step that just succeeded.
    pub fn on_abort<F>(&mut self, step: &'static str, compensation: F)
    where
        F: Future<Output = Result<(), String>> + Send + 'static,
    {
        self.compensations.push((step, Box::pin(compensation)));
    }

    /// Run all registered compensations in reverse order.
    pub async fn abort(mut self) {
        tracing::warn!("Saga {} aborted, compensating {} step(s)", self.label, self.compensations.len());
        while let Some((step, compensation)) = self.compensations.pop() {
            if let Err(e) = compensation.await {
                // Orphaned rows are possible from here on; there is no
                // reconciliation pass.
                tracing::error!("CRITICAL: saga {} compensation '{step}' failed: {e}", self.label);
            } else {
                tracing::info!("Saga {} compensated step '{step}'", self.label);
            }
        }
    }

    /// Discard pending compensations; the saga completed.
    pub fn commit(mut self) {
        self.compensations.clear();
    }
}
