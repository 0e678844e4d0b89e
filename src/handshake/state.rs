use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use super::message::{decode, CompletionNotice};
use super::HandshakeError;

/// What the service last told us about the calendar link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No status query has resolved yet.
    Unknown,
    Connected,
    Disconnected,
}

/// Status and pending flag folded into one value for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandshakePhase {
    Unknown,
    Disconnected,
    Pending,
    Connected,
}

/// Result of feeding one payload to the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeEvent {
    /// Not a completion notice, or nothing was pending.
    Ignored,
    Connected,
    Failed { reason: Option<String> },
}

/// Calendar connection state machine.
///
/// `unknown -> connected | disconnected` when a status query resolves;
/// `disconnected -> pending` on [`begin`](Self::begin); `pending -> connected`
/// or `pending -> disconnected` on the first completion notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarHandshake {
    status: ConnectionStatus,
    pending: bool,
}

impl Default for CalendarHandshake {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarHandshake {
    pub fn new() -> Self {
        CalendarHandshake {
            status: ConnectionStatus::Unknown,
            pending: false,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn phase(&self) -> HandshakePhase {
        if self.pending {
            return HandshakePhase::Pending;
        }
        match self.status {
            ConnectionStatus::Unknown => HandshakePhase::Unknown,
            ConnectionStatus::Connected => HandshakePhase::Connected,
            ConnectionStatus::Disconnected => HandshakePhase::Disconnected,
        }
    }

    /// Record the answer to a connection status query.
    pub fn apply_status_query(&mut self, connected: bool) {
        self.status = if connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        };
        debug!("calendar status query resolved: {:?}", self.status);
    }

    /// Start waiting for a completion notice. Only valid once a status query
    /// has reported the calendar disconnected.
    pub fn begin(&mut self) -> Result<(), HandshakeError> {
        if self.pending {
            return Err(HandshakeError::AlreadyPending);
        }
        match self.status {
            ConnectionStatus::Disconnected => {}
            ConnectionStatus::Connected => return Err(HandshakeError::AlreadyConnected),
            ConnectionStatus::Unknown => return Err(HandshakeError::StatusUnknown),
        }
        self.pending = true;
        debug!("calendar handshake pending");
        Ok(())
    }

    /// Feed a payload from the message channel.
    ///
    /// Only the first completion notice while pending has any effect.
    pub fn receive(&mut self, payload: &Value) -> HandshakeEvent {
        if !self.pending {
            debug!("ignoring payload, no handshake pending");
            return HandshakeEvent::Ignored;
        }
        let Some(notice) = decode(payload) else {
            debug!("ignoring payload that is not a completion notice");
            return HandshakeEvent::Ignored;
        };

        self.pending = false;
        match notice {
            CompletionNotice::Connected => {
                self.status = ConnectionStatus::Connected;
                info!("calendar connected");
                HandshakeEvent::Connected
            }
            CompletionNotice::Failed { reason } => {
                self.status = ConnectionStatus::Disconnected;
                info!("calendar connection failed: {}", reason.as_deref().unwrap_or("no reason given"));
                HandshakeEvent::Failed { reason }
            }
        }
    }

    /// Give up on a pending handshake without a result.
    pub fn dismiss(&mut self) {
        if self.pending {
            debug!("calendar handshake dismissed");
        }
        self.pending = false;
        self.status = ConnectionStatus::Disconnected;
    }
}
