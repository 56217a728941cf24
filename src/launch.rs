//! Desktop collaborators: clipboard, browser and mail client.

use thiserror::Error;

/// Fire-and-forget hand-offs to the desktop.
pub trait Launcher {
    fn copy(&mut self, text: &str) -> Result<(), LaunchError>;
    fn open(&mut self, url: &str) -> Result<(), LaunchError>;
    fn mail(&mut self, subject: &str, body: &str) -> Result<(), LaunchError>;
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("could not open {url}: {source}")]
    Browser {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// System clipboard via arboard, browser and mail via `webbrowser`.
#[derive(Default)]
pub struct SystemLauncher {
    // Kept alive: on X11 the selection disappears with its owner.
    clipboard: Option<arboard::Clipboard>,
}

impl SystemLauncher {
    pub fn new() -> Self {
        Self { clipboard: None }
    }

    fn clipboard(&mut self) -> Result<&mut arboard::Clipboard, LaunchError> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        Ok(self.clipboard.insert(clipboard))
    }
}

impl Launcher for SystemLauncher {
    fn copy(&mut self, text: &str) -> Result<(), LaunchError> {
        self.clipboard()?.set_text(text.to_string())?;
        Ok(())
    }

    fn open(&mut self, url: &str) -> Result<(), LaunchError> {
        webbrowser::open(url).map_err(|source| LaunchError::Browser {
            url: url.to_string(),
            source,
        })
    }

    fn mail(&mut self, subject: &str, body: &str) -> Result<(), LaunchError> {
        self.open(&mailto_url(subject, body))
    }
}

/// `mailto:` link with a prefilled subject and body (RFC 6068).
pub fn mailto_url(subject: &str, body: &str) -> String {
    format!("mailto:?subject={}&body={}", percent_encode(subject), percent_encode(body))
}

/// Escape everything but RFC 3986 unreserved characters.  Spaces become
/// `%20`, since mail clients show form-style `+` literally.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailto_escapes_subject_and_body() {
        assert_eq!(
            mailto_url("Rust & you?", "https://example.com/a?b=c"),
            "mailto:?subject=Rust%20%26%20you%3F&body=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
        );
    }

    #[test]
    fn mailto_encodes_utf8_bytes() {
        assert_eq!(mailto_url("café", ""), "mailto:?subject=caf%C3%A9&body=");
    }
}
