//! HTML bodies for the transactional emails.
//!
//! Every interpolated value is HTML-escaped.

use crate::EmailMessage;

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn wrap(title: &str, rows: &[(&str, &str)], footer: &str) -> String {
    let mut body = format!("<h2>{}</h2><table>", escape_html(title));
    for (label, value) in rows {
        body.push_str(&format!(
            "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
            escape_html(label),
            escape_html(value)
        ));
    }
    body.push_str("</table>");
    if !footer.is_empty() {
        body.push_str(&format!("<p>{}</p>", escape_html(footer)));
    }
    body
}

/// Alert to the site admin about a new contact-form message.
pub fn contact_admin_alert(
    admin_email: &str,
    name: &str,
    email: &str,
    subject: Option<&str>,
    message: &str,
) -> EmailMessage {
    let subject_line = subject.unwrap_or("(no subject)");
    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("New contact message from {name}"),
        html: wrap(
            "New contact message",
            &[
                ("Name", name),
                ("Email", email),
                ("Subject", subject_line),
                ("Message", message),
            ],
            "",
        ),
    }
}

/// Acknowledgement to the customer after a service request is submitted.
pub fn service_request_received(
    customer_email: &str,
    customer_name: &str,
    request_id: i64,
    project_title: &str,
    service_type: &str,
) -> EmailMessage {
    let reference = format!("#{request_id}");
    EmailMessage {
        to: customer_email.to_string(),
        subject: format!("We received your request {reference}"),
        html: wrap(
            &format!("Thanks, {customer_name}"),
            &[
                ("Reference", reference.as_str()),
                ("Project", project_title),
                ("Service", service_type),
            ],
            "Our team will review your request and send a quote shortly.",
        ),
    }
}

/// Alert to the site admin about a new service request.
pub fn service_request_admin_alert(
    admin_email: &str,
    request_id: i64,
    customer_name: &str,
    customer_email: &str,
    project_title: &str,
    service_type: &str,
    file_count: usize,
) -> EmailMessage {
    let reference = format!("#{request_id}");
    let files = file_count.to_string();
    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("New {service_type} request {reference}"),
        html: wrap(
            "New service request",
            &[
                ("Reference", reference.as_str()),
                ("Customer", customer_name),
                ("Email", customer_email),
                ("Project", project_title),
                ("Service", service_type),
                ("Files", files.as_str()),
            ],
            "",
        ),
    }
}

/// Acknowledgement to a candidate after an internship application.
pub fn application_received(email: &str, full_name: &str, position: &str) -> EmailMessage {
    EmailMessage {
        to: email.to_string(),
        subject: "Your internship application".to_string(),
        html: wrap(
            &format!("Thanks for applying, {full_name}"),
            &[("Position", position)],
            "We will get back to you after screening.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x & y")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; y&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn contact_alert_escapes_user_input() {
        let msg = contact_admin_alert(
            "admin@example.com",
            "Eve",
            "eve@example.com",
            None,
            "<b>buy now</b>",
        );
        assert_eq!(msg.to, "admin@example.com");
        assert!(msg.html.contains("(no subject)"));
        assert!(msg.html.contains("&lt;b&gt;buy now&lt;/b&gt;"));
        assert!(!msg.html.contains("<b>buy"));
    }

    #[test]
    fn service_request_ack_carries_reference() {
        let msg = service_request_received(
            "asha@example.com",
            "Asha",
            42,
            "Motor driver",
            "PCB_FABRICATION",
        );
        assert_eq!(msg.subject, "We received your request #42");
        assert!(msg.html.contains("PCB_FABRICATION"));
    }
}
