// src/config/settings.rs

use std::env;

use anyhow::Context;

// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub fonts_dir: String,
    pub cinema_brand: String,
    pub default_from_email: String,
    // Sem SMTP_HOST os e-mails vão para o log
    pub smtp: Option<SmtpSettings>,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    // STARTTLS sem verificar certificado. SOMENTE para desenvolvimento local.
    pub accept_invalid_certs: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let smtp = match non_empty("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host,
                port: non_empty("SMTP_PORT")
                    .map(|p| p.parse::<u16>())
                    .transpose()
                    .context("SMTP_PORT inválida")?
                    .unwrap_or(587),
                username: non_empty("SMTP_USERNAME"),
                password: non_empty("SMTP_PASSWORD"),
                accept_invalid_certs: non_empty("SMTP_ACCEPT_INVALID_CERTS")
                    .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes")),
            }),
            None => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr: non_empty("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            fonts_dir: non_empty("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()),
            cinema_brand: non_empty("CINEMA_BRAND").unwrap_or_else(|| "Cine.APIZACO".to_string()),
            default_from_email: non_empty("DEFAULT_FROM_EMAIL")
                .unwrap_or_else(|| "Cine.APIZACO <no-reply@cine.local>".to_string()),
            smtp,
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
