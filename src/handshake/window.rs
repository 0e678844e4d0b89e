use log::debug;

use super::HandshakeError;

/// Where the provider consent page is shown.
pub trait ConsentWindow {
    /// Open the consent page in a separate browser window.
    fn open_popup(&self, url: &str) -> Result<(), HandshakeError>;

    /// Fallback when no window could be opened: send the user to the URL from
    /// the current session.
    fn redirect(&self, url: &str);
}

/// The system browser via the platform opener.
pub struct SystemBrowser {
    /// Skip the opener and always fall back to printing the URL.
    pub disabled: bool,
}

impl ConsentWindow for SystemBrowser {
    fn open_popup(&self, url: &str) -> Result<(), HandshakeError> {
        if self.disabled {
            return Err(HandshakeError::PopupBlocked("browser launch disabled".to_string()));
        }
        debug!("opening consent page in system browser");
        open::that(url).map_err(|e| HandshakeError::PopupBlocked(e.to_string()))
    }

    fn redirect(&self, url: &str) {
        eprintln!("Open this URL in your browser to connect your calendar:");
        eprintln!();
        eprintln!("  {}", url);
        eprintln!();
    }
}
