// src/services/email_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    common::i18n::I18nStore,
    config::settings::SmtpSettings,
    models::orders::OrderDetail,
};

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

// Onde o e-mail vai parar: SMTP de verdade ou o log (desenvolvimento)
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()>;
}

// ---
// SMTP (lettre)
// ---
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpSettings, from: &str) -> anyhow::Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
            .port(smtp.port);

        if smtp.accept_invalid_certs {
            // STARTTLS sem verificar o certificado. SOMENTE para desenvolvimento local.
            tracing::warn!("⚠️ SMTP aceitando certificados inválidos em {}", smtp.host);
            let tls = TlsParameters::builder(smtp.host.clone())
                .dangerous_accept_invalid_certs(true)
                .build_rustls()?;
            builder = builder.tls(Tls::Required(tls));
        }

        if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.text_body, email.html_body))?;

        self.transport.send(message).await?;
        Ok(())
    }
}

// ---
// Log: equivalente ao backend de console
// ---
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "📧 SMTP não configurado, e-mail apenas registrado:\n{}",
            email.text_body
        );
        Ok(())
    }
}

// ---
// Conteúdo do e-mail de confirmação
// ---
pub fn order_confirmation_email(
    store: &I18nStore,
    lang: &str,
    to: &str,
    order: &OrderDetail,
) -> OutgoingEmail {
    let number = order.header.display_id.to_string();
    let subject = store.translate_with(lang, "email.subject", &[("order", number.clone())]);
    let greeting = store.translate_with(lang, "email.greeting", &[("email", to.to_string())]);
    let body = store.translate_with(lang, "email.body", &[("order", number)]);
    let total_label = store.translate(lang, "email.total");
    let farewell = store.translate(lang, "email.farewell");
    let payment = order
        .header
        .payment_method
        .map(|m| {
            format!(
                "{}: {}",
                store.translate(lang, "email.payment_method"),
                store.translate(lang, &format!("payment.{}", m.code()))
            )
        });

    let mut lines: Vec<String> = Vec::new();
    if order.has_tickets {
        let seats: Vec<String> = order.tickets.iter().map(|t| t.seat_label()).collect();
        lines.push(format!("{}: {}", store.translate(lang, "ticket.seats"), seats.join(", ")));
    }
    for snack in &order.snacks {
        lines.push(format!("{} × {} = ${:.2}", snack.qty, snack.name, snack.line_total()));
    }
    let total = format!("{total_label}: ${:.2}", order.header.total_amount);

    // Texto puro
    let mut text_body = format!("{greeting}\n\n{body}\n\n");
    for line in &lines {
        text_body.push_str(&format!("- {line}\n"));
    }
    text_body.push_str(&format!("\n{total}\n"));
    if let Some(payment) = &payment {
        text_body.push_str(&format!("{payment}\n"));
    }
    text_body.push_str(&format!("\n{farewell}\n"));

    // HTML
    let items: String = lines.iter().map(|l| format!("<li>{}</li>", escape_html(l))).collect();
    let html_body = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>{title}</title></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <p>{greeting}</p>
    <p>{body}</p>
    <ul>{items}</ul>
    <p><strong>{total}</strong></p>
    {payment}
    <p>{farewell}</p>
  </div>
</body>
</html>"#,
        title = escape_html(&subject),
        greeting = escape_html(&greeting),
        body = escape_html(&body),
        total = escape_html(&total),
        payment = payment.as_deref().map(|p| format!("<p>{}</p>", escape_html(p))).unwrap_or_default(),
        farewell = escape_html(&farewell),
    );

    OutgoingEmail { to: to.to_string(), subject, text_body, html_body }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    i18n_store: I18nStore,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>, i18n_store: I18nStore) -> Self {
        Self { mailer, i18n_store }
    }

    // Dispara o envio em segundo plano. Falha de e-mail nunca derruba o pagamento.
    pub fn send_order_confirmation(&self, lang: &str, to: &str, order: &OrderDetail) {
        let email = order_confirmation_email(&self.i18n_store, lang, to, order);
        let mailer = self.mailer.clone();
        let display_id = order.header.display_id;

        tokio::spawn(async move {
            match mailer.send(email).await {
                Ok(()) => tracing::info!("📧 Confirmação do pedido #{} enviada", display_id),
                Err(e) => tracing::error!("🔥 Falha ao enviar confirmação do pedido #{}: {:?}", display_id, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::{
        fixtures::{order, snack_line, ticket_line},
        OrderStatus, PaymentMethod,
    };
    use rust_decimal::Decimal;
    use tokio::sync::mpsc;

    fn paid_detail() -> OrderDetail {
        let mut header = order(OrderStatus::Paid, Decimal::new(21000, 2));
        header.payment_method = Some(PaymentMethod::Card);
        OrderDetail::new(
            header,
            vec![ticket_line(Decimal::new(8500, 2))],
            vec![snack_line("Palomitas <XL>", 1, Decimal::new(12500, 2))],
        )
    }

    #[test]
    fn confirmation_is_localized_and_lists_the_lines() {
        let store = I18nStore::load().unwrap();
        let email = order_confirmation_email(&store, "es", "ana@cine.local", &paid_detail());

        assert_eq!(email.subject, "Confirmación de orden #42");
        assert!(email.text_body.contains("Hola ana@cine.local,"));
        assert!(email.text_body.contains("Asientos: D-4"));
        assert!(email.text_body.contains("Total: $210.00"));
        assert!(email.text_body.contains("Método de pago: Tarjeta de crédito o débito"));
    }

    #[test]
    fn html_body_escapes_markup() {
        let store = I18nStore::load().unwrap();
        let email = order_confirmation_email(&store, "en", "ana@cine.local", &paid_detail());

        assert!(email.html_body.contains("Palomitas &lt;XL&gt;"));
        assert!(!email.html_body.contains("<XL>"));
    }

    struct ChannelMailer(mpsc::UnboundedSender<OutgoingEmail>);

    #[async_trait]
    impl Mailer for ChannelMailer {
        async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()> {
            self.0.send(email)?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn confirmation_is_sent_in_background() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let service = EmailService::new(Arc::new(ChannelMailer(tx)), I18nStore::load().unwrap());

        service.send_order_confirmation("pt", "bia@cine.local", &paid_detail());

        let sent = rx.recv().await.unwrap();
        assert_eq!(sent.to, "bia@cine.local");
        assert_eq!(sent.subject, "Confirmação do pedido #42");
    }

    #[tokio::test]
    async fn log_mailer_never_fails() {
        let store = I18nStore::load().unwrap();
        let email = order_confirmation_email(&store, "en", "x@y.z", &paid_detail());
        assert!(LogMailer.send(email).await.is_ok());
    }
}
