use crate::core::agent::ClockAgent;
use crate::domain::model::{ClockOutcome, Direction};
use crate::domain::ports::{BrowserDriver, CredentialStore, Notifier};
use crate::utils::error::{AgentError, Result};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(10),
        }
    }
}

pub struct ClockEngine<D, C, N> {
    agent: ClockAgent<D, C, N>,
    retry: RetryPolicy,
}

impl<D, C, N> ClockEngine<D, C, N>
where
    D: BrowserDriver,
    C: CredentialStore,
    N: Notifier,
{
    pub fn new(agent: ClockAgent<D, C, N>) -> Self {
        Self::with_retry_policy(agent, RetryPolicy::default())
    }

    pub fn with_retry_policy(agent: ClockAgent<D, C, N>, retry: RetryPolicy) -> Self {
        Self { agent, retry }
    }

    /// Brings the session up, retrying only connectivity failures.
    pub async fn connect_with_retry(&mut self) -> Result<()> {
        let attempts = self.retry.attempts;
        for attempt in 1..=attempts {
            match self.agent.connect().await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_connectivity() => {
                    warn!("Connection attempt {}/{} failed: {}", attempt, attempts, e);
                    if attempt < attempts {
                        info!("Retrying in {}s", self.retry.delay.as_secs());
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(AgentError::RetriesExhausted { attempts })
    }

    pub async fn run(&mut self, direction: Direction) -> Result<ClockOutcome> {
        info!("{}", direction);
        self.connect_with_retry().await?;
        self.agent.perform(direction).await
    }
}
