//! Shared utilities for use cases.
//!
//! Contains the cancellable, time-limited generation call used by every
//! debate and council step.

use crate::config::BehaviorConfig;
use crate::ports::generation_gateway::{GatewayError, GenerationGateway, GenerationRequest};
use colloquy_domain::Agent;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Run one prompt as `agent`, honouring cancellation and the per-call timeout.
///
/// A cancelled token yields [`GatewayError::Cancelled`]; an elapsed timeout
/// yields [`GatewayError::Timeout`]. The returned content is trimmed.
pub(crate) async fn generate<G: GenerationGateway + ?Sized>(
    gateway: &G,
    agent: &Agent,
    prompt: String,
    behavior: &BehaviorConfig,
    cancellation_token: &CancellationToken,
) -> Result<String, GatewayError> {
    if cancellation_token.is_cancelled() {
        return Err(GatewayError::Cancelled);
    }

    debug!(
        "Generating with {} ({} chars prompt)",
        agent.label(),
        prompt.len()
    );

    let request = GenerationRequest::new(prompt)
        .with_model(agent.model.clone())
        .with_working_dir(behavior.working_dir.clone());
    let call = gateway.execute(&agent.backend, request);

    let result = match behavior.timeout {
        Some(limit) => tokio::select! {
            _ = cancellation_token.cancelled() => Err(GatewayError::Cancelled),
            timed = tokio::time::timeout(limit, call) => {
                timed.unwrap_or(Err(GatewayError::Timeout))
            }
        },
        None => tokio::select! {
            _ = cancellation_token.cancelled() => Err(GatewayError::Cancelled),
            result = call => result,
        },
    };

    result.map(|generation| generation.content.trim().to_string())
}
