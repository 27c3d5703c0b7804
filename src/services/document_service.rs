// src/services/document_service.rs

use anyhow::anyhow;
use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PaymentRepository, SettingsRepository},
    models::{payment::PaymentView, settings::ShopSettings},
};

fn render_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow!("receipt rendering failed: {}", e))
}

#[derive(Clone)]
pub struct DocumentService {
    payment_repo: PaymentRepository,
    settings_repo: SettingsRepository,
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(payment_repo: PaymentRepository, settings_repo: SettingsRepository, fonts_dir: String) -> Self {
        Self {
            payment_repo,
            settings_repo,
            fonts_dir,
        }
    }

    /// Renders a printable receipt for one payment.
    pub async fn receipt_pdf(&self, payment_id: Uuid) -> Result<Vec<u8>, AppError> {
        let view = self
            .payment_repo
            .find_view(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment"))?;
        let settings = self.settings_repo.get_settings().await?;

        let buffer = self.render_receipt(&view, &settings)?;
        tracing::debug!(
            payment_id = %payment_id,
            receipt = %view.payment.receipt_number,
            bytes = buffer.len(),
            "Receipt rendered"
        );
        Ok(buffer)
    }

    fn render_receipt(&self, view: &PaymentView, settings: &ShopSettings) -> Result<Vec<u8>, AppError> {
        let payment = &view.payment;
        let currency = &settings.currency_symbol;

        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None).map_err(|e| {
            AppError::InternalServerError(anyhow!("font 'Roboto' not found in {}: {}", self.fonts_dir, e))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Receipt {}", payment.receipt_number));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- Header ---
        doc.push(
            elements::Paragraph::new(settings.display_name())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        if let Some(phone) = &settings.phone {
            doc.push(elements::Paragraph::new(format!("Tel: {}", phone)).styled(style::Style::new().with_font_size(10)));
        }
        if let Some(address) = &settings.address {
            doc.push(elements::Paragraph::new(address.as_str()).styled(style::Style::new().with_font_size(10)));
        }

        doc.push(elements::Break::new(1.5));
        doc.push(
            elements::Paragraph::new(format!("PAYMENT RECEIPT {}", payment.receipt_number))
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Break::new(1));

        // --- Details ---
        let mut table = elements::TableLayout::new(vec![2, 3]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(false, false, false));

        let mut rows: Vec<(&str, String)> = vec![
            ("Date", payment.payment_date.format("%Y-%m-%d %H:%M").to_string()),
            ("Invoice", view.invoice_number.clone()),
            (
                "Customer",
                view.customer_name.clone().unwrap_or_else(|| "Walk-in customer".to_string()),
            ),
        ];
        if let Some(number) = view.installment_number {
            rows.push(("Installment", format!("#{}", number)));
        }
        rows.push(("Method", payment.payment_method.label().to_string()));
        if let Some(user) = &view.user_name {
            rows.push(("Received by", user.clone()));
        }
        if let Some(notes) = &payment.notes {
            rows.push(("Notes", notes.clone()));
        }

        let bold = style::Style::new().bold();
        for (label, value) in rows {
            table
                .row()
                .element(elements::Paragraph::new(label).styled(bold))
                .element(elements::Paragraph::new(value))
                .push()
                .map_err(render_error)?;
        }
        doc.push(table);
        doc.push(elements::Break::new(1.5));

        let mut amount = elements::Paragraph::new(format!("AMOUNT PAID: {}{:.2}", currency, payment.amount));
        amount.set_alignment(genpdf::Alignment::Right);
        doc.push(amount.styled(style::Style::new().bold().with_font_size(14)));
        doc.push(elements::Break::new(2));

        // --- QR code of the receipt number ---
        let code = QrCode::new(payment.receipt_number.as_bytes()).map_err(render_error)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);
        let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
            .map_err(render_error)?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);

        // --- Footer ---
        if let Some(footer) = &settings.receipt_footer {
            doc.push(elements::Break::new(2));
            doc.push(elements::Paragraph::new(footer.as_str()).styled(style::Style::new().italic().with_font_size(8)));
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(render_error)?;
        Ok(buffer)
    }
}
