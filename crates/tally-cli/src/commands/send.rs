use std::path::PathBuf;
use tally_core::delivery::{self, Attachment, OutgoingMessage, SendmailTransport};
use tally_core::error::ReportError;

pub fn run(
    files: Vec<PathBuf>,
    to: String,
    from: String,
    subject: String,
    body: String,
    sendmail: PathBuf,
) -> Result<(), ReportError> {
    // Reject a bad address before reading any attachment
    delivery::validate_address(&to)?;

    let attachments = files
        .iter()
        .map(|path| Attachment::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    let message = OutgoingMessage {
        from,
        to,
        subject,
        body,
        attachments,
    };

    let transport = SendmailTransport::new(sendmail);
    delivery::deliver(&transport, &message)?;

    eprintln!(
        "Sent {} attachment(s) to {}",
        message.attachments.len(),
        message.to
    );
    Ok(())
}
