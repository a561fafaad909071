//! Premium-integration status, supplied by an injected async capability.
//!
//! The status only widens the connection-invite limit. While the check is
//! pending, or when it fails or times out, the standard limit applies.

use std::time::Duration;

use async_trait::async_trait;

/// Answers whether the sender has the premium integration enabled.
#[async_trait]
pub trait PremiumStatusProvider: Send + Sync {
    async fn is_premium(&self) -> anyhow::Result<bool>;
}

/// Provider with a known answer (CLI flag, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedPremiumStatus(pub bool);

#[async_trait]
impl PremiumStatusProvider for FixedPremiumStatus {
    async fn is_premium(&self) -> anyhow::Result<bool> {
        Ok(self.0)
    }
}

/// Where the premium check stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PremiumStatus {
    /// No answer yet.
    #[default]
    Pending,
    Active,
    Inactive,
    /// The check failed or timed out.
    Unavailable,
}

impl PremiumStatus {
    /// Only a confirmed `Active` counts as premium.
    pub fn is_premium(self) -> bool {
        matches!(self, PremiumStatus::Active)
    }
}

/// Run the check with a timeout. Failures are logged, never returned.
pub async fn fetch_premium_status(
    provider: &dyn PremiumStatusProvider,
    timeout: Duration,
) -> PremiumStatus {
    match tokio::time::timeout(timeout, provider.is_premium()).await {
        Ok(Ok(true)) => PremiumStatus::Active,
        Ok(Ok(false)) => PremiumStatus::Inactive,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Premium status check failed, using standard limits");
            PremiumStatus::Unavailable
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "Premium status check timed out, using standard limits"
            );
            PremiumStatus::Unavailable
        }
    }
}
