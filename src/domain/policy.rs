use crate::error::{FetchError, Result};
use std::time::Duration;

/// Default per-attempt deadline.
pub const DEFAULT_TIMEOUT: &str = "10s";

/// How the transport treats 3xx responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Follow redirects transparently up to the hop limit.
    FollowAll,
    /// Return the first redirect response as a normal response.
    StopAtFirst,
}

impl RedirectPolicy {
    pub fn from_follow_flag(follow: bool) -> Self {
        if follow {
            RedirectPolicy::FollowAll
        } else {
            RedirectPolicy::StopAtFirst
        }
    }
}

/// Timeout, redirect and retry settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPolicy {
    /// Deadline for a single attempt; `None` waits forever.
    pub timeout: Option<Duration>,
    pub redirect: RedirectPolicy,
    /// Extra attempts after the first one fails.
    pub retry_count: u32,
}

impl ExecutionPolicy {
    /// Builds a policy from raw flag values.
    ///
    /// Fails with `InvalidTimeoutFormat` before any network I/O when the
    /// timeout is not a duration such as `10s` or `2m`.
    pub fn from_flags(timeout: &str, follow_redirects: bool, retry_count: u32) -> Result<Self> {
        Ok(Self {
            timeout: parse_timeout(timeout)?,
            redirect: RedirectPolicy::from_follow_flag(follow_redirects),
            retry_count,
        })
    }

    /// Total number of attempts the executor may make.
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(10)),
            redirect: RedirectPolicy::StopAtFirst,
            retry_count: 0,
        }
    }
}

/// Parses a human duration string. A zero duration disables the deadline.
pub fn parse_timeout(raw: &str) -> Result<Option<Duration>> {
    let duration = humantime::parse_duration(raw.trim()).map_err(|e| {
        FetchError::InvalidTimeoutFormat {
            input: raw.to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok((!duration.is_zero()).then_some(duration))
}
