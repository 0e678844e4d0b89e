//! Calendar connection handshake.
//!
//! The consent page runs in the user's browser and reports back by posting a
//! completion message to a loopback listener owned by this process.

pub mod listener;
pub mod message;
pub mod state;
pub mod window;

use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;
use tokio::time::Instant;

use crate::api::{ApiError, CalendarService};
use crate::notice::Notice;
use listener::MessageListener;
use state::{CalendarHandshake, HandshakeEvent};
use window::ConsentWindow;

pub use state::{ConnectionStatus, HandshakePhase};

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("A calendar connection is already in progress")]
    AlreadyPending,

    #[error("The calendar is already connected")]
    AlreadyConnected,

    #[error("Calendar connection status has not been checked yet")]
    StatusUnknown,

    #[error("Could not open a browser window: {0}")]
    PopupBlocked(String),

    #[error("Callback listener failed: {0}")]
    Listener(#[from] std::io::Error),

    #[error("Callback listener stopped before the connection completed")]
    ListenerClosed,

    #[error("Could not get the calendar authorization URL: {0}")]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub callback_port: u16,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    Failed { reason: Option<String> },
    /// No completion message arrived before the deadline.
    TimedOut,
}

impl ConnectOutcome {
    pub fn notice(&self, timeout: Duration) -> Notice {
        match self {
            ConnectOutcome::Connected => {
                Notice::success("Calendar connected. New interviews will include a meeting link.")
            }
            ConnectOutcome::Failed { .. } => {
                Notice::error("Calendar connection failed. Please try again.")
            }
            ConnectOutcome::TimedOut => Notice::info(format!(
                "No response from the consent page after {}s. Calendar is not connected.",
                timeout.as_secs()
            )),
        }
    }
}

/// Run one connect attempt to completion.
///
/// Binds the listener, asks the service for a consent URL that reports back
/// to it, shows the consent page, then waits for the first completion
/// message or the deadline. The listener is torn down before returning.
pub fn connect<S, W>(
    service: &S,
    window: &W,
    handshake: &mut CalendarHandshake,
    options: &ConnectOptions,
) -> Result<ConnectOutcome, HandshakeError>
where
    S: CalendarService + ?Sized,
    W: ConsentWindow + ?Sized,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut listener = runtime.block_on(MessageListener::bind(options.callback_port))?;
    handshake.begin()?;

    let return_url = listener.return_url();
    let auth_url = match service.get_auth_url(&return_url) {
        Ok(url) => url,
        Err(e) => {
            handshake.dismiss();
            runtime.block_on(listener.shutdown());
            return Err(HandshakeError::Api(e));
        }
    };

    if let Err(e) = window.open_popup(&auth_url) {
        warn!("{}; falling back to manual navigation", e);
        window.redirect(&auth_url);
    }

    info!("waiting up to {:?} for calendar consent", options.timeout);
    let outcome = runtime.block_on(wait_for_completion(&mut listener, handshake, options.timeout));
    runtime.block_on(listener.shutdown());
    outcome
}

async fn wait_for_completion(
    listener: &mut MessageListener,
    handshake: &mut CalendarHandshake,
    timeout: Duration,
) -> Result<ConnectOutcome, HandshakeError> {
    let deadline = Instant::now() + timeout;
    loop {
        match tokio::time::timeout_at(deadline, listener.next_message()).await {
            Ok(Some(payload)) => match handshake.receive(&payload) {
                HandshakeEvent::Ignored => continue,
                HandshakeEvent::Connected => return Ok(ConnectOutcome::Connected),
                HandshakeEvent::Failed { reason } => return Ok(ConnectOutcome::Failed { reason }),
            },
            Ok(None) => {
                handshake.dismiss();
                return Err(HandshakeError::ListenerClosed);
            }
            Err(_) => {
                debug!("calendar consent deadline passed");
                handshake.dismiss();
                return Ok(ConnectOutcome::TimedOut);
            }
        }
    }
}
