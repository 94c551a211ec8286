use crate::{
    error::{Error, Result},
    table::describe_table::TableState,
};

use std::time;

/// Fixed-interval, bounded polling.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PollPolicy {
    /// Delay between two status checks.
    pub interval: time::Duration,
    /// Maximum number of status checks before giving up.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: time::Duration::from_secs(10),
            max_attempts: 30,
        }
    }
}

/// Poll `describe` until the table reports active.
///
/// `describe` returning `Ok(None)` (status unavailable, e.g. the create call has not
/// propagated yet) counts as "not active". Errors from `describe` end the wait. The wait
/// sleeps between checks and stops with [`Error::Timeout`] once the attempts are spent;
/// dropping the returned future cancels it.
pub async fn wait_until_active<F, Fut>(
    table_name: &str,
    policy: &PollPolicy,
    mut describe: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<TableState>>>,
{
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match describe().await? {
            Some(state) if state.is_active() => {
                tracing::info!(table = table_name, attempt, "table active");
                return Ok(());
            }
            Some(state) => {
                tracing::debug!(table = table_name, attempt, status = ?state.status, "table not active yet");
            }
            None => {
                tracing::debug!(table = table_name, attempt, "table status unavailable");
            }
        }
        if attempt < max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Err(Error::Timeout {
        table: table_name.to_string(),
        attempts: max_attempts,
    })
}
