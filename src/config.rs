//! Connection settings.

use crate::consts;
use std::time::Duration;

/// How the firmware revision bytes are requested during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevisionQuery {
    /// Issue `vr` twice, reading one byte each time (revision, then sub-revision).
    #[default]
    PerField,
    /// Issue `vr` once and read both bytes from the same answer.
    Combined,
}

/// Serial settings and timeouts used by a connection.
///
/// ```
/// use std::time::Duration;
/// use stdaq::ConnectionConfig;
///
/// let config = ConnectionConfig::default()
///     .with_baud_rate(115_200)
///     .with_read_timeout(Duration::from_millis(250));
/// assert_eq!(config.baud_rate, 115_200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Serial baud rate (8N1 framing is fixed).
    pub baud_rate: u32,
    /// Timeout applied to every response read.
    pub read_timeout: Duration,
    /// Timeout for each line read while discarding stale input on open.
    pub drain_timeout: Duration,
    /// Maximum number of stale lines discarded on open before giving up
    /// draining. 0 disables draining.
    pub max_drain_lines: usize,
    /// Revision request style used by [`crate::Stdaq::get_version`].
    pub revision_query: RevisionQuery,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            baud_rate: consts::DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(consts::DEFAULT_READ_TIMEOUT_MS),
            drain_timeout: Duration::from_millis(consts::DEFAULT_DRAIN_TIMEOUT_MS),
            max_drain_lines: consts::DEFAULT_MAX_DRAIN_LINES,
            revision_query: RevisionQuery::default(),
        }
    }
}

impl ConnectionConfig {
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn with_max_drain_lines(mut self, lines: usize) -> Self {
        self.max_drain_lines = lines;
        self
    }

    pub fn with_revision_query(mut self, query: RevisionQuery) -> Self {
        self.revision_query = query;
        self
    }
}
