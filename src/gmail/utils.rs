//! Gmail utility functions
//!
//! Base64url transport decoding, header lookup, and outbound MIME assembly.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::error::{PipelineError, Result};
use crate::gmail::types::MessagePart;
use crate::mail::types::OutboundEmail;

/// Validate an email address
pub fn validate_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);

    !local.is_empty()
        && !domain.is_empty()
        && !local.contains(' ')
        && !domain.contains(' ')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Encode text for MIME header (RFC 2047)
pub fn encode_mime_header(text: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && c != '\r' && c != '\n') {
        return text.to_string();
    }

    // MIME Words encoding (RFC 2047), Base64 variant
    format!(
        "=?UTF-8?B?{}?=",
        base64::engine::general_purpose::STANDARD.encode(text.as_bytes())
    )
}

/// Encode a raw email message for the Gmail API (base64url, no padding)
pub fn encode_raw_message(message: &str) -> String {
    URL_SAFE_NO_PAD.encode(message.as_bytes())
}

/// Decode base64url data from the Gmail API.
/// Handles both padded and non-padded base64url encoding.
pub fn decode_base64url(data: &str) -> Result<Vec<u8>> {
    // The API typically returns unpadded base64url
    URL_SAFE_NO_PAD
        .decode(data)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE.decode(data))
        .or_else(|_| base64::engine::general_purpose::STANDARD.decode(data))
        .map_err(|e| {
            crate::error::MailMcpError::Pipeline(PipelineError::InvalidBase64 {
                message: e.to_string(),
            })
        })
}

/// Decode base64url data to a string, replacing invalid UTF-8 sequences
pub fn decode_base64url_string(data: &str) -> Result<String> {
    let bytes = decode_base64url(data)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Find header value by name (case-insensitive)
pub fn find_header<'a>(part: &'a MessagePart, name: &str) -> Option<&'a str> {
    part.headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Assemble an RFC 2822 multipart message for the send endpoint.
///
/// The result is the raw message text; callers base64url-encode it with
/// [`encode_raw_message`].
pub fn create_mime_message(email: &OutboundEmail) -> Result<String> {
    for address in &email.to {
        if !validate_email(address) {
            return Err(crate::error::MailMcpError::Pipeline(
                PipelineError::InvalidEmail {
                    email: address.clone(),
                },
            ));
        }
    }

    let boundary = format!("boundary_{}", generate_boundary());
    let mut lines = Vec::new();

    lines.push("MIME-Version: 1.0".to_string());
    lines.push(format!("To: {}", email.to.join(", ")));
    if !email.cc.is_empty() {
        lines.push(format!("Cc: {}", email.cc.join(", ")));
    }
    if !email.bcc.is_empty() {
        lines.push(format!("Bcc: {}", email.bcc.join(", ")));
    }
    lines.push(format!("Subject: {}", encode_mime_header(&email.subject)));
    lines.push(format!(
        "Content-Type: multipart/mixed; boundary={}",
        boundary
    ));
    lines.push(String::new());

    if let Some(ref text) = email.content.text {
        lines.push(format!("--{}", boundary));
        lines.push("Content-Type: text/plain; charset=UTF-8".to_string());
        lines.push(String::new());
        lines.push(text.clone());
    }

    if let Some(ref html) = email.content.html {
        lines.push(format!("--{}", boundary));
        lines.push("Content-Type: text/html; charset=UTF-8".to_string());
        lines.push(String::new());
        lines.push(html.clone());
    }

    for attachment in &email.attachments {
        lines.push(format!("--{}", boundary));
        lines.push(format!("Content-Type: {}", attachment.content_type));
        lines.push(format!(
            "Content-Disposition: attachment; filename=\"{}\"",
            encode_mime_header(&attachment.filename)
        ));
        lines.push("Content-Transfer-Encoding: base64".to_string());
        lines.push(String::new());
        lines.push(base64::engine::general_purpose::STANDARD.encode(&attachment.content));
    }

    lines.push(format!("--{}--", boundary));

    Ok(lines.join("\r\n"))
}

/// Generate a boundary string for multipart messages
fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{:x}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gmail::types::Header;
    use crate::mail::types::{Attachment, EmailBody};

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com"));
        assert!(validate_email("user.name@domain.co.uk"));
        assert!(validate_email("a@b.co"));
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email("user@.com"));
        assert!(!validate_email("user@domain."));
    }

    #[test]
    fn test_encode_mime_header_ascii() {
        let text = "Hello World";
        assert_eq!(encode_mime_header(text), text);
    }

    #[test]
    fn test_encode_mime_header_unicode() {
        let text = "Héllo Wörld";
        let encoded = encode_mime_header(text);
        assert!(encoded.starts_with("=?UTF-8?B?"));
        assert!(encoded.ends_with("?="));
    }

    #[test]
    fn test_decode_base64url() {
        let encoded = "SGVsbG8gV29ybGQ"; // "Hello World"
        let decoded = decode_base64url_string(encoded).unwrap();
        assert_eq!(decoded, "Hello World");
    }

    #[test]
    fn test_decode_base64url_padded() {
        let encoded = "SGVsbG8gV29ybGQ=";
        let decoded = decode_base64url_string(encoded).unwrap();
        assert_eq!(decoded, "Hello World");
    }

    #[test]
    fn test_find_header_case_insensitive() {
        let part = MessagePart {
            headers: vec![Header {
                name: "Subject".to_string(),
                value: "Hello".to_string(),
            }],
            ..Default::default()
        };
        assert_eq!(find_header(&part, "subject"), Some("Hello"));
        assert_eq!(find_header(&part, "SUBJECT"), Some("Hello"));
        assert_eq!(find_header(&part, "from"), None);
    }

    #[test]
    fn test_create_mime_message() {
        let email = OutboundEmail {
            to: vec!["test@example.com".to_string()],
            cc: vec![],
            bcc: vec![],
            subject: "Test Subject".to_string(),
            content: EmailBody {
                text: Some("Test body".to_string()),
                html: None,
            },
            attachments: vec![],
        };
        let message = create_mime_message(&email).unwrap();
        assert!(message.contains("To: test@example.com"));
        assert!(message.contains("Subject: Test Subject"));
        assert!(message.contains("Content-Type: text/plain; charset=UTF-8"));
        assert!(message.contains("Test body"));
        assert!(!message.contains("Cc:"));
    }

    #[test]
    fn test_create_mime_message_with_attachment() {
        let email = OutboundEmail {
            to: vec!["test@example.com".to_string()],
            cc: vec!["copy@example.com".to_string()],
            bcc: vec![],
            subject: "Report".to_string(),
            content: EmailBody {
                text: Some("See attached".to_string()),
                html: Some("<p>See attached</p>".to_string()),
            },
            attachments: vec![Attachment {
                filename: "report.pdf".to_string(),
                content: vec![1, 2, 3],
                content_type: "application/pdf".to_string(),
            }],
        };
        let message = create_mime_message(&email).unwrap();
        assert!(message.contains("Cc: copy@example.com"));
        assert!(message.contains("Content-Type: text/html; charset=UTF-8"));
        assert!(message.contains("Content-Disposition: attachment; filename=\"report.pdf\""));
        assert!(message.contains("Content-Transfer-Encoding: base64"));
    }

    #[test]
    fn test_create_mime_message_rejects_invalid_recipient() {
        let email = OutboundEmail {
            to: vec!["invalid-email".to_string()],
            cc: vec![],
            bcc: vec![],
            subject: "Test".to_string(),
            content: EmailBody {
                text: Some("Body".to_string()),
                html: None,
            },
            attachments: vec![],
        };
        assert!(create_mime_message(&email).is_err());
    }
}
