use async_trait::async_trait;
use html_escape::encode_text;
use interfaces::{MailError, Mailer, OutboundEmail};
use lettre::message::{Mailbox, MultiPart};
use lettre::{Address, Message};
use tracing::{debug, info};

/// Parse a recipient the way an SMTP envelope would accept it.
pub fn parse_mailbox(raw: &str) -> Result<Mailbox, MailError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidRecipient(raw.to_string()))
}

/// Turn a composed email into a `multipart/alternative` message.
pub fn build_message(email: &OutboundEmail, from: &Mailbox) -> Result<Message, MailError> {
    let to = parse_mailbox(&email.to)?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .map_err(|e| MailError::Delivery(format!("Failed to build message: {}", e)))
}

/// Delivery stub: every message is built in full and written to the log
/// instead of being handed to a transport.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: Mailbox,
}

impl LogMailer {
    pub fn new(sender_name: &str, sender_email: &str) -> anyhow::Result<Self> {
        let address: Address = sender_email.trim().parse()?;
        let name = Some(sender_name.trim().to_string()).filter(|n| !n.is_empty());
        Ok(Self {
            from: Mailbox::new(name, address),
        })
    }

    pub fn sender(&self) -> &Mailbox {
        &self.from
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let message = build_message(email, &self.from)?;
        let recipients: Vec<String> = message.envelope().to().iter().map(ToString::to_string).collect();

        info!(
            to = %recipients.join(", "),
            subject = %email.subject,
            bytes = message.formatted().len(),
            "Outbound email (not delivered)"
        );
        debug!("{}", email.text_body);
        Ok(())
    }
}

/// Contact details printed under every reply.
#[derive(Debug, Clone)]
pub struct ReplySignature {
    pub site_name: String,
    pub email: String,
    pub phone: String,
}

/// An admin's answer to a contact message.
#[derive(Debug, Clone)]
pub struct ReplyDraft {
    pub to: String,
    pub subject: String,
    pub message: String,
    pub original_message: Option<String>,
    pub sender_name: Option<String>,
}

/// Escape and keep line breaks.
fn html_lines(text: &str) -> String {
    encode_text(&text.replace("\r\n", "\n")).replace('\n', "<br>")
}

pub fn compose_reply(draft: &ReplyDraft, signature: &ReplySignature) -> OutboundEmail {
    let mut html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
<h2>Reply from {site}</h2>
<div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">{body}</div>"#,
        site = encode_text(&signature.site_name),
        body = html_lines(&draft.message),
    );
    let mut text = draft.message.clone();

    if let Some(original) = draft.original_message.as_deref().filter(|m| !m.trim().is_empty()) {
        let sender = draft.sender_name.as_deref().unwrap_or("you");
        html.push_str(&format!(
            r#"
<hr style="margin: 20px 0; border: none; border-top: 1px solid #eee;">
<h3>Original Message:</h3>
<p><strong>From:</strong> {sender}</p>
<div style="background-color: #f9f9f9; padding: 15px; border-radius: 8px; font-size: 14px;">{original}</div>"#,
            sender = encode_text(sender),
            original = html_lines(original),
        ));
        text.push_str(&format!("\n\n--- Original message from {} ---\n{}", sender, original));
    }

    html.push_str(&format!(
        r#"
<div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; font-size: 12px; color: #666;">
<p>Best regards,<br>{site}</p>
<p>Email: {email}<br>Phone: {phone}</p>
</div>
</div>"#,
        site = encode_text(&signature.site_name),
        email = encode_text(&signature.email),
        phone = encode_text(&signature.phone),
    ));
    text.push_str(&format!(
        "\n\nBest regards,\n{}\nEmail: {}\nPhone: {}",
        signature.site_name, signature.email, signature.phone
    ));

    OutboundEmail {
        to: draft.to.trim().to_string(),
        subject: draft.subject.clone(),
        text_body: text,
        html_body: html,
    }
}

pub fn compose_newsletter(to: &str, subject: &str, content: &str) -> OutboundEmail {
    OutboundEmail {
        to: to.trim().to_string(),
        subject: subject.to_string(),
        text_body: content.to_string(),
        html_body: format!("<p>{}</p>", html_lines(content)),
    }
}
