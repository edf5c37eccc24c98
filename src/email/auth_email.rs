use super::{Mailer, OutgoingEmail};
use crate::error::AppError;
use crate::models::token::TOKEN_TTL_MINUTES;

/// Who an account email goes to, and the one-time code it carries.
#[derive(Debug, Clone, Copy)]
pub struct EmailRecipient<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub token: &'a str,
}

/// Account emails: confirmation codes and password-reset codes.
pub struct AuthEmail;

impl AuthEmail {
    pub fn confirmation(frontend_url: &str, user: &EmailRecipient<'_>) -> OutgoingEmail {
        let link = format!("{}/auth/confirm-account", frontend_url);
        OutgoingEmail {
            to: user.email.to_string(),
            subject: "UpTask - Confirm your account".to_string(),
            text: format!(
                "Hi {}, you have created your UpTask account. Confirm it at {} with the code {}. \
                 The code expires in {} minutes.",
                user.name, link, user.token, TOKEN_TTL_MINUTES
            ),
            html: format!(
                "<p>Hi: {name}, you have created your UpTask account, it's almost ready, you just need to confirm it</p>\
                 <p>Visit the following link:</p>\
                 <a href=\"{link}\">Confirm account</a>\
                 <p>And enter the code: <b>{token}</b></p>\
                 <p>This code expires in {ttl} minutes</p>",
                name = escape_html(user.name),
                link = link,
                token = escape_html(user.token),
                ttl = TOKEN_TTL_MINUTES,
            ),
        }
    }

    pub fn password_reset(frontend_url: &str, user: &EmailRecipient<'_>) -> OutgoingEmail {
        let link = format!("{}/auth/new-password", frontend_url);
        OutgoingEmail {
            to: user.email.to_string(),
            subject: "UpTask - Reset your password".to_string(),
            text: format!(
                "Hi {}, you have requested to reset your password. Go to {} and enter the code {}. \
                 The code expires in {} minutes.",
                user.name, link, user.token, TOKEN_TTL_MINUTES
            ),
            html: format!(
                "<p>Hi: {name}, you have requested to reset your password.</p>\
                 <p>Visit the following link:</p>\
                 <a href=\"{link}\">Reset password</a>\
                 <p>And enter the code: <b>{token}</b></p>\
                 <p>This code expires in {ttl} minutes</p>",
                name = escape_html(user.name),
                link = link,
                token = escape_html(user.token),
                ttl = TOKEN_TTL_MINUTES,
            ),
        }
    }

    pub async fn send_confirmation_email(
        mailer: &Mailer,
        frontend_url: &str,
        user: &EmailRecipient<'_>,
    ) -> Result<(), AppError> {
        mailer.send(Self::confirmation(frontend_url, user)).await
    }

    pub async fn send_password_reset_token(
        mailer: &Mailer,
        frontend_url: &str,
        user: &EmailRecipient<'_>,
    ) -> Result<(), AppError> {
        mailer.send(Self::password_reset(frontend_url, user)).await
    }
}

fn escape_html(input: &str) -> String {
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
