use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use uuid::Uuid;

use crate::config::SettlementConfig;
use crate::db::SharedPaymentStore;
use crate::error::{AppError, AppResult};
use crate::services::hooks::HookRegistry;
use crate::services::intouch::{IntouchService, ProviderStatus};

/// Method string written to the record when the provider settles.
pub const PAYMENT_METHOD: &str = "intouch";

/// Terminal verdict of one settlement confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Paid,
    Failed,
}

#[derive(Debug, Clone)]
pub struct SettlementJob {
    pub payment_id: Uuid,
}

/// Producer half of the settlement queue, shared with the request handlers.
#[derive(Clone)]
pub struct SettlementQueue {
    tx: mpsc::Sender<SettlementJob>,
}

impl SettlementQueue {
    pub async fn enqueue(&self, payment_id: Uuid) -> AppResult<()> {
        self.tx
            .send(SettlementJob { payment_id })
            .await
            .map_err(|_| AppError::Internal("settlement worker is not running".to_string()))
    }
}

/// Everything a settlement needs: the store to update, the provider client
/// to poll, the hooks to notify and the timing budget.
pub struct SettlementContext {
    pub store: SharedPaymentStore,
    pub intouch: Arc<IntouchService>,
    pub hooks: Arc<HookRegistry>,
    pub config: SettlementConfig,
}

/// Spawns the background settlement worker.
///
/// Each job gets its own task so concurrent settlements do not queue behind
/// each other's wait windows. The worker stops once every queue handle is
/// dropped, draining in-flight settlements first.
pub fn spawn_worker(ctx: Arc<SettlementContext>) -> (SettlementQueue, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<SettlementJob>(64);

    let handle = tokio::spawn(async move {
        tracing::info!("Settlement worker started");

        let mut jobs = JoinSet::new();
        loop {
            // Finished jobs are reaped as they complete; the set must not
            // hold onto results for the life of the process.
            tokio::select! {
                job = rx.recv() => {
                    let Some(job) = job else { break };
                    let ctx = ctx.clone();
                    jobs.spawn(async move {
                        let outcome = settle(&ctx, job.payment_id).await;
                        tracing::info!(
                            payment_id = %job.payment_id,
                            outcome = ?outcome,
                            "Settlement finished"
                        );
                    });
                }
                Some(_) = jobs.join_next(), if !jobs.is_empty() => {}
            }
        }

        while jobs.join_next().await.is_some() {}

        tracing::info!("Settlement worker stopped");
    });

    (SettlementQueue { tx }, handle)
}

/// Confirms one payment against the provider and applies the result.
///
/// Waits out the provider's processing window, then polls the status
/// endpoint with exponential backoff. Only an explicit `SUCCESSFUL` marks
/// the record paid; an explicit `FAILED` ends the confirmation immediately.
/// Pending statuses and transport faults are retried until the attempt
/// budget runs out, at which point the payment is treated as failed.
pub async fn settle(ctx: &SettlementContext, payment_id: Uuid) -> SettlementOutcome {
    tokio::time::sleep(Duration::from_secs(ctx.config.initial_delay_secs)).await;

    let mut delay = Duration::from_secs(ctx.config.retry_delay_secs);
    let max_delay = Duration::from_secs(ctx.config.max_retry_delay_secs);

    for attempt in 1..=ctx.config.max_attempts {
        match ctx.intouch.client().check_status(payment_id).await {
            Ok(response) => match response.provider_status() {
                ProviderStatus::Successful => {
                    return apply_success(ctx, payment_id, response.transaction_id.as_deref())
                        .await;
                }
                ProviderStatus::Failed => {
                    tracing::info!(
                        payment_id = %payment_id,
                        attempt,
                        "Intouch reported the payment as failed"
                    );
                    return apply_failure(ctx, payment_id).await;
                }
                ProviderStatus::Pending => {
                    tracing::debug!(
                        payment_id = %payment_id,
                        attempt,
                        status = %response.status,
                        "Payment still pending at the provider"
                    );
                }
            },
            Err(e) => {
                tracing::warn!(
                    payment_id = %payment_id,
                    attempt,
                    "Status poll failed, will retry: {}",
                    e
                );
            }
        }

        if attempt < ctx.config.max_attempts {
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(max_delay);
        }
    }

    tracing::warn!(
        payment_id = %payment_id,
        attempts = ctx.config.max_attempts,
        "Settlement confirmation budget exhausted"
    );
    apply_failure(ctx, payment_id).await
}

async fn apply_success(
    ctx: &SettlementContext,
    payment_id: Uuid,
    transaction_id: Option<&str>,
) -> SettlementOutcome {
    match ctx
        .store
        .mark_paid(payment_id, PAYMENT_METHOD, transaction_id)
        .await
    {
        Ok(Some(payment)) => {
            tracing::info!(
                payment_id = %payment_id,
                transaction_id = transaction_id.unwrap_or("-"),
                "Payment settled"
            );
            ctx.hooks
                .dispatch(payment.success_hook.as_deref(), &payment)
                .await;
            SettlementOutcome::Paid
        }
        Ok(None) => {
            tracing::warn!(
                payment_id = %payment_id,
                "Payment record vanished before settlement could be applied"
            );
            SettlementOutcome::Failed
        }
        Err(e) => {
            tracing::error!(
                payment_id = %payment_id,
                "Failed to persist settlement: {}",
                e
            );
            SettlementOutcome::Failed
        }
    }
}

async fn apply_failure(ctx: &SettlementContext, payment_id: Uuid) -> SettlementOutcome {
    match ctx.store.find_by_id(payment_id).await {
        Ok(Some(payment)) => {
            ctx.hooks
                .dispatch(payment.failure_hook.as_deref(), &payment)
                .await;
        }
        Ok(None) => {
            tracing::warn!(
                payment_id = %payment_id,
                "Payment record vanished before the failure hook could run"
            );
        }
        Err(e) => {
            tracing::error!(
                payment_id = %payment_id,
                "Failed to load payment for failure handling: {}",
                e
            );
        }
    }
    SettlementOutcome::Failed
}
