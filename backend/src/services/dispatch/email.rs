//! Certificate email dispatch over SMTP.
//!
//! Configuration comes from the environment; when `SMTP_HOST` is unset
//! the endpoint reports dispatch as unconfigured instead of attempting a
//! send. The body phrasing adapts to the certificate category.

use actix_web::{web, HttpResponse, Responder};
use common::requests::SendEmailRequest;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde_json::json;

const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_FROM_ADDRESS: &str = "certificates@localhost";

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_address: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Returns `None` when `SMTP_HOST` is not set, signalling that email
    /// dispatch is not configured.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        Some(SmtpConfig {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            user: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASS").ok(),
        })
    }
}

pub async fn process(payload: web::Json<SendEmailRequest>) -> impl Responder {
    let req = payload.into_inner();
    if let Err(missing) = validate_request(&req) {
        return HttpResponse::BadRequest().json(json!({ "error": missing }));
    }
    let Some(config) = SmtpConfig::from_env() else {
        return HttpResponse::ServiceUnavailable()
            .json(json!({ "error": "Email dispatch is not configured (SMTP_HOST unset)" }));
    };
    match send_certificate_email(&config, &req).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "message": "Certificate email sent" })),
        Err(e) => {
            log::error!("certificate email dispatch failed: {}", e);
            HttpResponse::BadGateway().json(json!({ "error": e }))
        }
    }
}

/// Pre-flight: all of recipient, name, and link must be present before
/// any network call is attempted.
pub(crate) fn validate_request(req: &SendEmailRequest) -> Result<(), String> {
    if req.recipient_email.trim().is_empty() {
        return Err("Missing recipient email".to_string());
    }
    if req.recipient_name.trim().is_empty() {
        return Err("Missing recipient name".to_string());
    }
    if req.certificate_link.trim().is_empty() {
        return Err("Missing certificate link".to_string());
    }
    Ok(())
}

async fn send_certificate_email(config: &SmtpConfig, req: &SendEmailRequest) -> Result<(), String> {
    let category = if req.category.trim().is_empty() {
        "Participation"
    } else {
        req.category.trim()
    };

    let email = Message::builder()
        .from(
            format!("Certificates <{}>", config.from_address)
                .parse()
                .map_err(|e| format!("Bad from address: {}", e))?,
        )
        .to(req
            .recipient_email
            .trim()
            .parse()
            .map_err(|e| format!("Bad recipient address: {}", e))?)
        .subject(format!(
            "Official Certificate: {} - {}",
            req.recipient_name, category
        ))
        .header(ContentType::TEXT_HTML)
        .body(email_html(&req.recipient_name, category, &req.certificate_link))
        .map_err(|e| e.to_string())?;

    let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        .map_err(|e| e.to_string())?
        .port(config.port);
    if let (Some(user), Some(password)) = (&config.user, &config.password) {
        builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
    }
    let mailer = builder.build();

    mailer.send(email).await.map_err(|e| e.to_string())?;
    Ok(())
}

/// Category-aware appreciation line for the email body.
pub(crate) fn category_blurb(category: &str) -> &'static str {
    let c = category.to_lowercase();
    if c.contains("keynote") {
        "We express our sincere gratitude for your invaluable contribution as a <strong>Keynote Speaker</strong>. Your insights greatly enriched our summit and inspired our attendees."
    } else if c.contains("presenter") || c.contains("paper") {
        "Thank you for sharing your research and expertise as a <strong>Presenter</strong>. Your presentation was a vital part of our success."
    } else if c.contains("committee") || c.contains("organizing") {
        "We deeply appreciate your dedication and hard work as a member of the <strong>Organizing Committee</strong>. This event would not have been possible without your efforts."
    } else if c.contains("advisory") || c.contains("board") {
        "Thank you for your strategic guidance and support as a member of our <strong>Advisory Board</strong>. Your leadership is greatly valued."
    } else {
        "Thank you for participating. We hope you found the sessions valuable and insightful."
    }
}

fn email_html(recipient_name: &str, category: &str, link: &str) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Congratulations, {recipient_name}!</h2>
  <p>{blurb}</p>
  <p>Your official certificate for <strong>{category}</strong> is now available.</p>
  <p><a href="{link}">View my certificate</a></p>
  <p style="color: #6b7280; font-size: 13px;">This link also lets anyone verify the authenticity of the certificate.</p>
</div>"#,
        blurb = category_blurb(category),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SendEmailRequest {
        SendEmailRequest {
            recipient_email: "jane@x.org".to_string(),
            recipient_name: "Jane Doe".to_string(),
            certificate_link: "https://example.org/verify/abc".to_string(),
            category: "Keynote Speaker".to_string(),
        }
    }

    #[test]
    fn preflight_blocks_incomplete_requests() {
        assert!(validate_request(&request()).is_ok());
        let mut missing_email = request();
        missing_email.recipient_email = "  ".to_string();
        assert!(validate_request(&missing_email).is_err());
        let mut missing_link = request();
        missing_link.certificate_link = String::new();
        assert!(validate_request(&missing_link).is_err());
    }

    #[test]
    fn blurbs_follow_the_category() {
        assert!(category_blurb("Keynote Speaker").contains("Keynote Speaker"));
        assert!(category_blurb("Paper Presenter").contains("Presenter"));
        assert!(category_blurb("Organizing Committee").contains("Organizing Committee"));
        assert!(category_blurb("Advisory Board").contains("Advisory Board"));
        assert!(category_blurb("Listener").contains("participating"));
    }

    #[test]
    fn body_embeds_name_category_and_link() {
        let html = email_html("Jane Doe", "Innovation", "https://example.org/verify/abc");
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("Innovation"));
        assert!(html.contains("https://example.org/verify/abc"));
    }
}
