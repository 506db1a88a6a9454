//! Resolves which subscriptions a run covers.

use tracing::info;

use crate::error::{ProviderError, SweepError};
use crate::provider::{AccountScope, Provider};

/// One explicitly requested subscription, or every subscription the
/// credential can see. Zero visible subscriptions is a valid, empty answer.
pub fn resolve<P: Provider + ?Sized>(
    provider: &P,
    subscription_id: Option<&str>,
) -> Result<Vec<AccountScope>, SweepError> {
    let scopes = match subscription_id {
        Some(id) => {
            info!(event = "accounts.resolve_single", subscription = id);
            let scope = provider.get_scope(id).map_err(|e| match e {
                ProviderError::NotFound(_) => SweepError::ScopeNotFound(id.to_string()),
                other => SweepError::enumeration(id, other),
            })?;
            vec![scope]
        }
        None => {
            info!(event = "accounts.list_started");
            provider
                .list_scopes()
                .map_err(|e| SweepError::enumeration("*", e))?
        }
    };

    info!(event = "accounts.resolved", count = scopes.len());
    Ok(scopes)
}
