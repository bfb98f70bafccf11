//! Welcome email delivery for newly provisioned members.
//!
//! Sends through the Resend API. A single attempt per provisioning: a
//! failed send surfaces as a hard error to the webhook caller, because at
//! that point the account exists with no way for the member to learn of it.
//! Retrying the whole webhook would hit the idempotent already-exists path
//! and skip the email, so the failure has to be loud and operator-visible.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Welcome message inputs: recipient plus the two links the body carries.
pub struct WelcomeEmail<'a> {
    pub to_email: &'a str,
    pub name: &'a str,
    /// One-time password-setup link scoped to this member.
    pub setup_link: &'a str,
    /// Static login URL for after the password is set.
    pub login_url: &'a str,
}

/// Transactional email backend. A trait so tests can count and fail sends.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_welcome(&self, email: &WelcomeEmail<'_>) -> Result<()>;
}

/// Resend API request body.
#[derive(Debug, Serialize)]
struct ResendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    text: String,
    html: String,
}

/// Resend API response.
#[derive(Debug, Deserialize)]
struct ResendEmailResponse {
    #[allow(dead_code)]
    id: String,
}

/// Email service using the Resend API.
#[derive(Clone)]
pub struct EmailService {
    api_key: String,
    from_email: String,
    http_client: Client,
}

impl EmailService {
    /// Key and sender address are validated for presence at startup by
    /// `Config::from_env`.
    pub fn new(api_key: String, from_email: String) -> Self {
        Self {
            api_key,
            from_email,
            http_client: Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for EmailService {
    async fn send_welcome(&self, email: &WelcomeEmail<'_>) -> Result<()> {
        let (subject, text, html) = compose_welcome(email);

        let request = ResendEmailRequest {
            from: &self.from_email,
            to: vec![email.to_email],
            subject,
            text,
            html,
        };

        let response = self
            .http_client
            .post(RESEND_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, to = %email.to_email, "Failed to reach Resend API");
                AppError::Email(format!("Failed to send welcome email: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                to = %email.to_email,
                "Resend API rejected welcome email"
            );
            return Err(AppError::Email(format!(
                "Failed to send welcome email: {} - {}",
                status, body
            )));
        }

        let _result: ResendEmailResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse Resend API response");
            AppError::Email("Email service response error".into())
        })?;

        tracing::info!(to = %email.to_email, "Welcome email sent via Resend");
        Ok(())
    }
}

/// Compose the fixed Portuguese welcome message. Returns (subject, text, html).
fn compose_welcome(email: &WelcomeEmail<'_>) -> (String, String, String) {
    let subject = "Bem-vindo ao Clube Receitas! Crie sua senha".to_string();

    let text = format!(
        "Olá, {}!\n\n\
         Seu pagamento foi confirmado e sua conta no Clube Receitas está pronta.\n\n\
         Para começar, crie sua senha de acesso pelo link abaixo (válido por 48 horas):\n\
         {}\n\n\
         Depois disso, acesse sua conta a qualquer momento em:\n\
         {}\n\n\
         Bom apetite!\n\
         Equipe Clube Receitas\n\n\
         ---\n\
         Your payment was confirmed. Use the link above to create your password and sign in.",
        email.name, email.setup_link, email.login_url
    );

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h2 style="color: #333;">Olá, {}!</h2>
<p>Seu pagamento foi confirmado e sua conta no <strong>Clube Receitas</strong> está pronta.</p>
<p>Para começar, crie sua senha de acesso pelo botão abaixo (o link é válido por 48 horas):</p>
<div style="text-align: center; margin: 30px 0;">
<a href="{}" style="background: #e85d3a; color: #fff; padding: 14px 28px; border-radius: 8px; text-decoration: none; font-weight: bold;">Criar minha senha</a>
</div>
<p>Depois disso, acesse sua conta a qualquer momento em <a href="{}">{}</a>.</p>
<p>Bom apetite!<br>Equipe Clube Receitas</p>
<hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">
<p style="color: #999; font-size: 12px;">Your payment was confirmed. Use the button above to create your password and sign in.</p>
</body>
</html>"#,
        email.name, email.setup_link, email.login_url, email.login_url
    );

    (subject, text, html)
}
