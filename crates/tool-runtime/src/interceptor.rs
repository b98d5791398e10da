//! Gate between the orchestration loop and the underlying operations.
//!
//! Every invocation passes through [`InvocationInterceptor::intercept`]. Each
//! one starts PENDING and resolves to EXECUTED or DENIED:
//!
//! ```text
//! PENDING --AutoApprove------------------> EXECUTED
//! PENDING --RequireConfirmation + "Y"----> EXECUTED
//! PENDING --RequireConfirmation + other--> DENIED
//! PENDING --Deny-------------------------> DENIED
//! ```
//!
//! Decisions are never cached: a repeated request prompts again.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::approval::{ApprovalPrompt, DENIAL_REASON};
use crate::invocation::{InvocationRequest, InvocationResult};
use crate::permission::PermissionLevel;
use crate::tool::ToolError;

pub struct InvocationInterceptor {
    prompt: Arc<dyn ApprovalPrompt>,
}

impl InvocationInterceptor {
    pub fn new(prompt: Arc<dyn ApprovalPrompt>) -> Self {
        Self { prompt }
    }

    /// Run `next` for `request` if `level` allows it.
    ///
    /// `next` is called at most once. Its result, success or failure, is
    /// returned unchanged.
    pub async fn intercept<F, Fut>(
        &self,
        request: &InvocationRequest,
        level: PermissionLevel,
        next: F,
    ) -> Result<InvocationResult, ToolError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<InvocationResult, ToolError>>,
    {
        let operation = request.operation();
        debug!(%operation, call_id = request.call_id(), ?level, "Invocation pending");

        match level {
            PermissionLevel::AutoApprove => {}
            PermissionLevel::Deny => {
                warn!(%operation, "Invocation denied by policy");
                return Ok(InvocationResult::denied(format!(
                    "Operation '{}' is denied by policy",
                    operation
                )));
            }
            PermissionLevel::RequireConfirmation => {
                if !self.prompt.ask(request)?.is_approved() {
                    warn!(%operation, "Invocation not approved by the user");
                    return Ok(InvocationResult::denied(DENIAL_REASON));
                }
                info!(%operation, "Invocation approved by the user");
            }
        }

        let result = next().await;
        debug!(%operation, ok = result.is_ok(), "Invocation executed");
        result
    }
}
