//! Hands rendered report artifacts to a mail transport.
//!
//! The recipient address is checked before any transport is touched, and a
//! failed send is reported once with no retry.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use tracing::info;

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9.-]+\.[A-Za-z0-9_]+$")
        .expect("hardcoded address regex is valid")
});

const MIME_BOUNDARY: &str = "=_tally_report_part_=";
const BASE64_LINE_LEN: usize = 76;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("'{0}' is not a valid email address")]
    InvalidAddress(String),

    #[error("no report attachments were provided")]
    NoAttachments,

    #[error("{field} must be a single line")]
    MultilineHeader { field: &'static str },

    #[error("failed to send email: {0}")]
    Transport(String),
}

/// Syntactic check: `local@domain.tld`, letters/digits/dot/hyphen/underscore
/// on both sides, at least one dot in the domain.
pub fn validate_address(address: &str) -> Result<(), DeliveryError> {
    if ADDRESS.is_match(address.trim()) {
        Ok(())
    } else {
        Err(DeliveryError::InvalidAddress(address.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = content_type_for(&filename).to_string();
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "report.pdf".into());
        Ok(Self::new(filename, bytes))
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}

#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

impl OutgoingMessage {
    /// Check every value that ends up in a header. `sendmail -t` takes its
    /// recipients from the headers, so a line break in any of them could add
    /// an unchecked `Bcc:`.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        validate_address(&self.to)?;
        validate_address(&self.from)?;
        single_line("subject", &self.subject)?;
        for attachment in &self.attachments {
            single_line("attachment filename", &attachment.filename)?;
            single_line("attachment content type", &attachment.content_type)?;
        }
        Ok(())
    }

    /// Render as a multipart/mixed RFC 5322 message. Line breaks in header
    /// values are dropped.
    pub fn to_mime(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("From: {}\r\n", header_text(&self.from)));
        out.push_str(&format!("To: {}\r\n", header_text(&self.to)));
        out.push_str(&format!(
            "Subject: {}\r\n",
            encode_header(&header_text(&self.subject))
        ));
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str(&format!(
            "Content-Type: multipart/mixed; boundary=\"{}\"\r\n\r\n",
            MIME_BOUNDARY
        ));

        out.push_str(&format!("--{}\r\n", MIME_BOUNDARY));
        out.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        out.push_str("Content-Transfer-Encoding: 8bit\r\n\r\n");
        out.push_str(&self.body);
        out.push_str("\r\n");

        for attachment in &self.attachments {
            let filename = header_text(&attachment.filename).replace('"', "");
            out.push_str(&format!("--{}\r\n", MIME_BOUNDARY));
            out.push_str(&format!(
                "Content-Type: {}; name=\"{}\"\r\n",
                header_text(&attachment.content_type),
                filename
            ));
            out.push_str("Content-Transfer-Encoding: base64\r\n");
            out.push_str(&format!(
                "Content-Disposition: attachment; filename=\"{}\"\r\n\r\n",
                filename
            ));
            let encoded = STANDARD.encode(&attachment.bytes);
            for chunk in encoded.as_bytes().chunks(BASE64_LINE_LEN) {
                out.push_str(&String::from_utf8_lossy(chunk));
                out.push_str("\r\n");
            }
        }

        out.push_str(&format!("--{}--\r\n", MIME_BOUNDARY));
        out
    }
}

fn single_line(field: &'static str, value: &str) -> Result<(), DeliveryError> {
    if value.contains(['\r', '\n']) {
        Err(DeliveryError::MultilineHeader { field })
    } else {
        Ok(())
    }
}

fn header_text(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

/// RFC 2047 encoded-word for non-ASCII subjects.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

/// Trait for mail transport backends.
pub trait MailTransport {
    fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError>;

    /// Name of this transport (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Transport that pipes the message to a local `sendmail -t -i`.
pub struct SendmailTransport {
    program: PathBuf,
}

impl SendmailTransport {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SendmailTransport {
    fn default() -> Self {
        Self::new("sendmail")
    }
}

impl MailTransport for SendmailTransport {
    fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        let mut child = Command::new(&self.program)
            .arg("-t")
            .arg("-i")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DeliveryError::Transport(format!("{}: {}", self.program.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(message.to_mime().as_bytes())
                .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        if !output.status.success() {
            return Err(DeliveryError::Transport(format!(
                "{} exited with code {}: {}",
                self.program.display(),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "sendmail"
    }
}

/// Validate and send. The transport is never called for a bad address, a
/// multi-line header value or an empty attachment list.
pub fn deliver(
    transport: &dyn MailTransport,
    message: &OutgoingMessage,
) -> Result<(), DeliveryError> {
    message.validate()?;
    if message.attachments.is_empty() {
        return Err(DeliveryError::NoAttachments);
    }

    transport.send(message)?;
    info!(
        to = %message.to,
        attachments = message.attachments.len(),
        transport = transport.backend_name(),
        "report delivered"
    );
    Ok(())
}
