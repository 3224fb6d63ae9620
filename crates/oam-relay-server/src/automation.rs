// oam-relay-server/src/automation.rs
// ============================================================================
// Module: Automation Worker
// Description: Queued out-of-band execution of automation invocations.
// Purpose: Keep slow downstream automation off the lifecycle caller's path.
// Dependencies: oam-relay-core, reqwest, tokio
// ============================================================================

//! ## Overview
//! Lifecycle calls hand automation work to a bounded queue and return; a
//! worker drains the queue and delivers each invocation through a gateway.
//! Queue overflow drops the task and records an audit event. No failure in
//! this module ever reaches a lifecycle caller — by the time a task runs,
//! the caller's request has already resolved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use oam_relay_core::AutomationExecutor;
use oam_relay_core::AutomationInvocation;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::audit::AuditSink;
use crate::audit::AutomationAuditEvent;

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Gateway errors raised while delivering automation work.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The automation execution service rejected or failed the delivery.
    #[error("automation delivery failed: {0}")]
    Delivery(String),
}

/// Delivery interface to the automation execution service.
#[async_trait]
pub trait AutomationGateway: Send + Sync {
    /// Delivers one automation invocation.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when delivery fails.
    async fn deliver(&self, invocation: &AutomationInvocation) -> Result<(), GatewayError>;

    /// Runs the secondary software-upgrade step.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the step fails.
    async fn upgrade(&self, fired: usize) -> Result<(), GatewayError>;
}

/// HTTP gateway delivering invocations to a remote automation service.
pub struct HttpAutomationGateway {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// Base URL of the automation execution service.
    base: String,
}

impl HttpAutomationGateway {
    /// Creates a gateway for the given base URL.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }
}

#[async_trait]
impl AutomationGateway for HttpAutomationGateway {
    async fn deliver(&self, invocation: &AutomationInvocation) -> Result<(), GatewayError> {
        let url = format!("{}/v1/execute-automation", self.base);
        let response = self
            .client
            .post(url)
            .json(invocation)
            .send()
            .await
            .map_err(|err| GatewayError::Delivery(err.to_string()))?;
        response.error_for_status().map_err(|err| GatewayError::Delivery(err.to_string()))?;
        Ok(())
    }

    async fn upgrade(&self, fired: usize) -> Result<(), GatewayError> {
        let url = format!("{}/v1/upgrade-software", self.base);
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "fired": fired }))
            .send()
            .await
            .map_err(|err| GatewayError::Delivery(err.to_string()))?;
        response.error_for_status().map_err(|err| GatewayError::Delivery(err.to_string()))?;
        Ok(())
    }
}

/// Gateway that accepts every task without delivering anywhere.
///
/// Used when no automation service is configured (local mode).
pub struct NullAutomationGateway;

#[async_trait]
impl AutomationGateway for NullAutomationGateway {
    async fn deliver(&self, _invocation: &AutomationInvocation) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn upgrade(&self, _fired: usize) -> Result<(), GatewayError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Task Queue
// ============================================================================

/// One unit of out-of-band automation work.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AutomationTask {
    /// Deliver a batch of invocations.
    Batch(Vec<AutomationInvocation>),
    /// Run the secondary software-upgrade step.
    SoftwareUpgrade {
        /// Number of invocations fired before the upgrade.
        fired: usize,
    },
}

/// Queue-backed [`AutomationExecutor`] handed to the orchestrator.
#[derive(Clone)]
pub struct QueuedAutomationExecutor {
    /// Task queue sender.
    sender: mpsc::Sender<AutomationTask>,
    /// Audit sink for dropped tasks.
    audit: Arc<dyn AuditSink>,
}

impl QueuedAutomationExecutor {
    /// Enqueues one task, recording a drop when the queue is full or closed.
    fn enqueue(&self, task: AutomationTask) {
        let recipe = match &task {
            AutomationTask::Batch(invocations) => {
                invocations.first().map(|invocation| invocation.recipe.clone())
            }
            AutomationTask::SoftwareUpgrade {
                ..
            } => None,
        };
        if let Err(err) = self.sender.try_send(task) {
            let detail = match err {
                mpsc::error::TrySendError::Full(_) => "queue full",
                mpsc::error::TrySendError::Closed(_) => "queue closed",
            };
            self.audit.record_automation(&AutomationAuditEvent::new(
                recipe,
                "dropped",
                Some(detail.to_string()),
            ));
        }
    }
}

impl AutomationExecutor for QueuedAutomationExecutor {
    fn submit(&self, invocations: Vec<AutomationInvocation>) {
        self.enqueue(AutomationTask::Batch(invocations));
    }

    fn submit_upgrade(&self, fired: usize) {
        self.enqueue(AutomationTask::SoftwareUpgrade {
            fired,
        });
    }
}

/// Worker draining the automation queue.
pub struct AutomationWorker {
    /// Task queue receiver.
    receiver: mpsc::Receiver<AutomationTask>,
    /// Delivery gateway.
    gateway: Arc<dyn AutomationGateway>,
    /// Audit sink for delivery outcomes.
    audit: Arc<dyn AuditSink>,
}

impl AutomationWorker {
    /// Runs the worker until the queue closes.
    pub async fn run(mut self) {
        while let Some(task) = self.receiver.recv().await {
            match task {
                AutomationTask::Batch(invocations) => {
                    for invocation in invocations {
                        match self.gateway.deliver(&invocation).await {
                            Ok(()) => {
                                self.audit.record_automation(&AutomationAuditEvent::new(
                                    Some(invocation.recipe),
                                    "delivered",
                                    None,
                                ));
                            }
                            Err(err) => {
                                self.audit.record_automation(&AutomationAuditEvent::new(
                                    Some(invocation.recipe),
                                    "failed",
                                    Some(err.to_string()),
                                ));
                            }
                        }
                    }
                }
                AutomationTask::SoftwareUpgrade {
                    fired,
                } => {
                    if let Err(err) = self.gateway.upgrade(fired).await {
                        self.audit.record_automation(&AutomationAuditEvent::new(
                            None,
                            "failed",
                            Some(err.to_string()),
                        ));
                    }
                }
            }
        }
    }
}

/// Builds the queue pair shared by the orchestrator and the worker.
#[must_use]
pub fn automation_channel(
    capacity: usize,
    gateway: Arc<dyn AutomationGateway>,
    audit: Arc<dyn AuditSink>,
) -> (QueuedAutomationExecutor, AutomationWorker) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        QueuedAutomationExecutor {
            sender,
            audit: Arc::clone(&audit),
        },
        AutomationWorker {
            receiver,
            gateway,
            audit,
        },
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for queue overflow handling and delivery outcomes.
    #![allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        clippy::dbg_macro,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only output and panic-based assertions are permitted."
    )]

    use std::sync::Mutex;

    use oam_relay_core::RecipeName;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        outcomes: Mutex<Vec<(Option<RecipeName>, &'static str)>>,
    }

    impl AuditSink for RecordingSink {
        fn record_lifecycle(&self, _event: &crate::audit::LifecycleAuditEvent) {}

        fn record_automation(&self, event: &AutomationAuditEvent) {
            self.outcomes.lock().unwrap().push((event.recipe.clone(), event.outcome));
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl AutomationGateway for FailingGateway {
        async fn deliver(&self, _invocation: &AutomationInvocation) -> Result<(), GatewayError> {
            Err(GatewayError::Delivery("unreachable".to_string()))
        }

        async fn upgrade(&self, _fired: usize) -> Result<(), GatewayError> {
            Err(GatewayError::Delivery("unreachable".to_string()))
        }
    }

    fn invocation(recipe: &str) -> AutomationInvocation {
        AutomationInvocation {
            recipe: RecipeName::new(recipe),
            payload: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn overflow_drops_the_batch_and_records_it() {
        let audit = Arc::new(RecordingSink::default());
        let (executor, _worker) =
            automation_channel(1, Arc::new(NullAutomationGateway), audit.clone());

        // The worker never runs, so the second submit overflows the queue.
        executor.submit(vec![invocation("subscription-broadcast")]);
        executor.submit(vec![invocation("disposal-broadcast")]);

        let outcomes = audit.outcomes.lock().unwrap().clone();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].1, "dropped");
        assert_eq!(outcomes[0].0, Some(RecipeName::new("disposal-broadcast")));
    }

    #[tokio::test]
    async fn worker_records_delivery_failures_without_propagating() {
        let audit = Arc::new(RecordingSink::default());
        let (executor, worker) = automation_channel(4, Arc::new(FailingGateway), audit.clone());

        executor.submit(vec![invocation("subscription-broadcast")]);
        executor.submit_upgrade(1);
        drop(executor);
        worker.run().await;

        let outcomes = audit.outcomes.lock().unwrap().clone();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|(_, outcome)| *outcome == "failed"));
    }

    #[tokio::test]
    async fn worker_delivers_batches_in_order() {
        let audit = Arc::new(RecordingSink::default());
        let (executor, worker) =
            automation_channel(4, Arc::new(NullAutomationGateway), audit.clone());

        executor.submit(vec![invocation("subscription-broadcast")]);
        executor.submit(vec![invocation("handover-notification")]);
        drop(executor);
        worker.run().await;

        let outcomes = audit.outcomes.lock().unwrap().clone();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, Some(RecipeName::new("subscription-broadcast")));
        assert_eq!(outcomes[1].0, Some(RecipeName::new("handover-notification")));
        assert!(outcomes.iter().all(|(_, outcome)| *outcome == "delivered"));
    }
}
