// src/services/document_service.rs

use sqlx::{Acquire, Postgres};
use uuid::Uuid;
use genpdf::{elements, style, Alignment, Element};
use image::Luma;
use qrcode::QrCode;
use crate::{
    common::{error::AppError, i18n::I18nStore},
    db::{CatalogRepository, OrderRepository},
    models::{
        catalog::ShowtimeDetail,
        orders::{Order, OrderTicketLine},
    },
};

// A6 deitado, em milímetros
const TICKET_PAGE_WIDTH_MM: u8 = 148;
const TICKET_PAGE_HEIGHT_MM: u8 = 105;

pub fn ticket_qr_payload(display_id: i32, user_id: Uuid) -> String {
    format!("ORDER-{display_id}-USER-{user_id}")
}

// Conteúdo do ingresso, já traduzido e formatado. Separado da renderização
// para não depender das fontes.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketSheet {
    pub brand: String,
    pub order_line: String,
    pub movie_line: String,
    pub showtime_line: String,
    pub auditorium_line: String,
    pub seats_label: String,
    pub seats: Vec<String>,
    pub total_line: String,
    pub qr_payload: String,
}

impl TicketSheet {
    pub fn build(
        store: &I18nStore,
        lang: &str,
        brand: &str,
        order: &Order,
        showtime: &ShowtimeDetail,
        tickets: &[OrderTicketLine],
        user_id: Uuid,
    ) -> Self {
        let label = |key: &str| store.translate(lang, key);

        Self {
            brand: brand.to_string(),
            order_line: format!("{}{}", label("ticket.order"), order.display_id),
            movie_line: format!("{}: {}", label("ticket.movie"), showtime.movie_title),
            showtime_line: format!(
                "{}: {}",
                label("ticket.showtime"),
                showtime.start_time.format("%d/%m/%Y %H:%M")
            ),
            auditorium_line: format!(
                "{}: {} ({})",
                label("ticket.auditorium"),
                showtime.auditorium_name,
                showtime.cinema_name
            ),
            seats_label: format!("{}:", label("ticket.seats")),
            seats: tickets.iter().map(OrderTicketLine::seat_label).collect(),
            total_line: format!("{}: ${:.2}", label("ticket.total_paid"), order.total_amount),
            qr_payload: ticket_qr_payload(order.display_id, user_id),
        }
    }
}

pub struct TicketPdf {
    pub display_id: i32,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct DocumentService {
    order_repo: OrderRepository,
    catalog_repo: CatalogRepository,
    i18n_store: I18nStore,
    fonts_dir: String,
    brand: String,
}

impl DocumentService {
    pub fn new(
        order_repo: OrderRepository,
        catalog_repo: CatalogRepository,
        i18n_store: I18nStore,
        fonts_dir: String,
        brand: String,
    ) -> Self {
        Self { order_repo, catalog_repo, i18n_store, fonts_dir, brand }
    }

    pub async fn generate_ticket_pdf<'e, E>(
        &self,
        executor: E,
        lang: &str,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<TicketPdf, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        // 1. Busca os Dados
        let order = self.order_repo
            .find_for_user(&mut *conn, order_id, user_id)
            .await?
            .ok_or(AppError::ResourceNotFound("order"))?;

        let tickets = self.order_repo.list_ticket_lines(&mut *conn, order.id).await?;

        // A sessão do ingresso vem do primeiro assento
        let first = tickets.first().ok_or(AppError::OrderHasNoTickets(order.display_id))?;
        let showtime = self.catalog_repo
            .find_showtime(&mut *conn, first.showtime_id)
            .await?
            .ok_or(AppError::ResourceNotFound("showtime"))?;

        drop(conn);

        // 2. Monta e renderiza
        let sheet = TicketSheet::build(&self.i18n_store, lang, &self.brand, &order, &showtime, &tickets, user_id);
        let bytes = self.render(&sheet)?;

        tracing::info!("🧾 Ingresso do pedido #{} gerado ({} bytes)", order.display_id, bytes.len());

        Ok(TicketPdf { display_id: order.display_id, bytes })
    }

    fn render(&self, sheet: &TicketSheet) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| AppError::FontNotFound(format!("Roboto em {}", self.fonts_dir)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(sheet.order_line.clone());
        doc.set_paper_size(genpdf::Size::new(TICKET_PAGE_WIDTH_MM, TICKET_PAGE_HEIGHT_MM));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(5);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        let mut header = elements::Paragraph::new(sheet.brand.as_str());
        header.set_alignment(Alignment::Center);
        doc.push(header.styled(style::Style::new().bold().with_font_size(14)));
        doc.push(elements::Break::new(1));

        // --- PEDIDO E SESSÃO ---
        let body = style::Style::new().with_font_size(9);
        for line in [&sheet.order_line, &sheet.movie_line, &sheet.showtime_line, &sheet.auditorium_line] {
            doc.push(elements::Paragraph::new(line.as_str()).styled(body));
        }
        doc.push(elements::Break::new(0.5));

        // --- ASSENTOS ---
        let mut seats = elements::Paragraph::default();
        seats.push_styled(sheet.seats_label.as_str(), style::Style::new().bold().with_font_size(10));
        seats.push_styled(format!(" {}", sheet.seats.join("  ")), body);
        doc.push(seats);
        doc.push(elements::Break::new(1));

        // --- TOTAL ---
        doc.push(elements::Paragraph::new(sheet.total_line.as_str())
            .styled(style::Style::new().bold().with_font_size(12)));

        // --- QR CODE ---
        let code = QrCode::new(sheet.qr_payload.as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        let image_buffer = code.render::<Luma<u8>>().min_dimensions(240, 240).build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_alignment(Alignment::Right)
            .with_scale(genpdf::Scale::new(1.5, 1.5));

        doc.push(pdf_image);

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
