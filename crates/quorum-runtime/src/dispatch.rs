//! Fan-out dispatcher.
//!
//! Issues one concurrent task per enabled provider, bounded by a
//! semaphore sized to the provider count so every provider starts
//! immediately, and collects every outcome before returning. A slow or
//! failing provider never blocks collection of the others, and no
//! failure short-circuits the batch.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use quorum_core::{ProviderResult, Query};

use crate::providers::{ChatProvider, ChatRequest, ProviderError};

/// Run one adapter call and normalize the outcome.
///
/// Every error is converted to an in-band record here: a missing
/// credential becomes an unavailable marker naming the credential, any
/// other failure becomes an error marker carrying the failure text.
pub async fn run_provider(provider: &dyn ChatProvider, query: &Query) -> ProviderResult {
    let request = ChatRequest::user(query.full_prompt());

    match provider.complete(request).await {
        Ok(text) => ProviderResult::answer(provider.name(), text.trim()),
        Err(ProviderError::NotConfigured(env_var)) => {
            tracing::debug!(provider = provider.name(), env_var, "provider unconfigured");
            ProviderResult::error(
                provider.name(),
                format!("[{} unavailable: {} not set]", provider.name(), env_var),
            )
        }
        Err(e) => {
            tracing::warn!(provider = provider.name(), error = %e, "provider call failed");
            ProviderResult::error(
                provider.name(),
                format!("[{} error: {}]", provider.name(), e),
            )
        }
    }
}

/// Dispatch one query to every enabled provider concurrently.
///
/// Returns one result per provider, in completion order — callers must
/// not assume positional correspondence with the input slice. A task
/// that panics (a defect, not an expected path) is logged and its slot
/// omitted rather than failing the dispatch.
pub async fn dispatch_all(
    query: &Query,
    providers: &[Arc<dyn ChatProvider>],
) -> Vec<ProviderResult> {
    if providers.is_empty() {
        return Vec::new();
    }

    let semaphore = Arc::new(Semaphore::new(providers.len()));
    let mut tasks = FuturesUnordered::new();

    for provider in providers {
        let semaphore = Arc::clone(&semaphore);
        let provider = Arc::clone(provider);
        let query = query.clone();

        tasks.push(tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // Closed semaphore: dispatcher is tearing down.
                    return ProviderResult::error(
                        provider.name(),
                        format!("[{} error: dispatch cancelled]", provider.name()),
                    );
                }
            };
            run_provider(provider.as_ref(), &query).await
        }));
    }

    let mut results = Vec::with_capacity(providers.len());
    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => tracing::error!(error = %e, "provider task aborted"),
        }
    }

    results
}
