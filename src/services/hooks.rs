use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::PaymentRequest;

/// Callback invoked with the payment record when a settlement concludes.
///
/// Records reference hooks by name (`success_hook` / `failure_hook`); the
/// registry below is the closed set of names the gateway will dispatch to.
#[async_trait]
pub trait PaymentHook: Send + Sync {
    async fn invoke(&self, payment: &PaymentRequest) -> AppResult<()>;
}

/// Name → hook lookup table, assembled once at startup.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn PaymentHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, hook: Arc<dyn PaymentHook>) {
        self.hooks.insert(name.into(), hook);
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn PaymentHook>> {
        self.hooks.get(name).cloned()
    }

    /// Resolves and invokes the named hook, if any.
    ///
    /// A record naming an unregistered hook is skipped, matching the
    /// original integration's behavior for undefined callbacks. Hook
    /// failures are logged and swallowed: a misbehaving callback must not
    /// change the settlement verdict.
    pub async fn dispatch(&self, name: Option<&str>, payment: &PaymentRequest) {
        let Some(name) = name else {
            return;
        };

        match self.resolve(name) {
            Some(hook) => {
                if let Err(e) = hook.invoke(payment).await {
                    tracing::error!(
                        hook = %name,
                        payment_id = %payment.id,
                        "Payment hook failed: {}",
                        e
                    );
                }
            }
            None => {
                tracing::warn!(
                    hook = %name,
                    payment_id = %payment.id,
                    "No payment hook registered under this name, skipping"
                );
            }
        }
    }
}

/// Built-in hook that writes an audit line for the settlement. Registered
/// under `log_settlement` so deployments get a trace without wiring any
/// application callback.
pub struct LogSettlementHook;

#[async_trait]
impl PaymentHook for LogSettlementHook {
    async fn invoke(&self, payment: &PaymentRequest) -> AppResult<()> {
        tracing::info!(
            payment_id = %payment.id,
            amount = payment.payment_amount,
            is_paid = payment.is_paid,
            transaction_id = payment.transaction_id.as_deref().unwrap_or("-"),
            "Settlement hook"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CountingHook {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PaymentHook for CountingHook {
        async fn invoke(&self, _payment: &PaymentRequest) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn dispatch_invokes_registered_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = HookRegistry::new();
        registry.register("order_confirmed", Arc::new(CountingHook { calls: calls.clone() }));

        let payment = PaymentRequest::new(Uuid::new_v4(), 100);
        registry.dispatch(Some("order_confirmed"), &payment).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_hook_names_are_skipped() {
        let registry = HookRegistry::new();
        let payment = PaymentRequest::new(Uuid::new_v4(), 100);
        // Must not panic or error.
        registry.dispatch(Some("never_registered"), &payment).await;
        registry.dispatch(None, &payment).await;
    }

    #[tokio::test]
    async fn hook_errors_do_not_propagate() {
        struct FailingHook;

        #[async_trait]
        impl PaymentHook for FailingHook {
            async fn invoke(&self, _payment: &PaymentRequest) -> AppResult<()> {
                Err(crate::error::AppError::Internal("boom".to_string()))
            }
        }

        let mut registry = HookRegistry::new();
        registry.register("exploding", Arc::new(FailingHook));

        let payment = PaymentRequest::new(Uuid::new_v4(), 100);
        registry.dispatch(Some("exploding"), &payment).await;
    }
}
