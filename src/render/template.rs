//! HTML rendering with tera
//!
//! The three page templates are compiled into the binary. A deployment can
//! point `templates.dir` at a directory holding files with the same names to
//! restyle the pages without rebuilding.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use tera::{Context, Tera};

use crate::core::error::{ConfigError, InvoiceResult, RenderingError};
use crate::core::form::InvoiceForm;
use crate::core::invoice::Invoice;
use crate::core::tax::{TaxBreakdown, format_money};

pub const INVOICE_TEMPLATE: &str = "invoice.html";
pub const FORM_TEMPLATE: &str = "create_invoice.html";
pub const LIST_TEMPLATE: &str = "list_invoices.html";

const TEMPLATE_NAMES: [&str; 3] = [INVOICE_TEMPLATE, FORM_TEMPLATE, LIST_TEMPLATE];

const EMBEDDED: [(&str, &str); 3] = [
    (INVOICE_TEMPLATE, include_str!("../../templates/invoice.html")),
    (FORM_TEMPLATE, include_str!("../../templates/create_invoice.html")),
    (LIST_TEMPLATE, include_str!("../../templates/list_invoices.html")),
];

const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";

/// One input of the invoice form as handed to the form template
#[derive(Debug, Serialize)]
struct FormField<'a> {
    name: &'static str,
    label: &'static str,
    kind: &'static str,
    value: &'a str,
    errors: &'a [String],
}

/// Renders invoice documents and the HTML pages
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Renderer using the templates compiled into the binary
    pub fn embedded() -> InvoiceResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(EMBEDDED.to_vec())
            .map_err(|e| template_error("embedded templates", e))?;
        Ok(Self { tera })
    }

    /// Renderer loading `*.html` from `dir`
    ///
    /// Every template name must be present in the directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> InvoiceResult<Self> {
        let dir = dir.as_ref();
        let glob = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&glob).map_err(|e| ConfigError::InvalidValue {
            field: "templates.dir".to_string(),
            value: dir.display().to_string(),
            message: e.to_string(),
        })?;

        let loaded: Vec<&str> = tera.get_template_names().collect();
        if let Some(missing) = TEMPLATE_NAMES.iter().find(|name| !loaded.contains(name)) {
            return Err(ConfigError::InvalidValue {
                field: "templates.dir".to_string(),
                value: dir.display().to_string(),
                message: format!("template '{}' not found", missing),
            }
            .into());
        }

        tracing::info!(dir = %dir.display(), "loaded templates from directory");
        Ok(Self { tera })
    }

    /// Render the invoice document with its derived tax amounts
    pub fn render_invoice(&self, invoice: &Invoice) -> InvoiceResult<String> {
        let tax = TaxBreakdown::for_invoice(invoice).display();

        let mut context = Context::new();
        context.insert("invoice", invoice);
        context.insert(
            "invoice_date",
            &invoice.invoice_date.format(DISPLAY_DATE_FORMAT).to_string(),
        );
        context.insert("amount", &format_money(invoice.amount));
        context.insert("gst_amount", &tax.gst_amount);
        context.insert("total_amount", &tax.total_amount);
        context.insert("cgst", &tax.cgst);
        context.insert("sgst", &tax.sgst);
        context.insert(
            "half_rate",
            &(invoice.gst_percentage / Decimal::TWO).normalize().to_string(),
        );

        self.render(INVOICE_TEMPLATE, &context)
    }

    /// Render the creation form with submitted values and field errors
    pub fn render_form(
        &self,
        form: &InvoiceForm,
        errors: &BTreeMap<String, Vec<String>>,
    ) -> InvoiceResult<String> {
        let field = |name, label, kind, value| form_field(name, label, kind, value, errors);

        let fields = vec![
            field("invoice_no", "Invoice No", "text", &form.invoice_no),
            field("invoice_date", "Invoice Date", "date", &form.invoice_date),
            field("client_name", "Client Name", "text", &form.client_name),
            field("client_address", "Client Address", "textarea", &form.client_address),
            field("client_gstin", "Client GSTIN", "text", &form.client_gstin),
            field(
                "subscription_period",
                "Subscription Period",
                "text",
                &form.subscription_period,
            ),
            field("amount", "Amount (INR)", "number", &form.amount),
            field("gst_percentage", "GST %", "number", &form.gst_percentage),
            field("razorpay_txn_id", "Razorpay TXN ID", "text", &form.razorpay_txn_id),
        ];

        let mut context = Context::new();
        context.insert("fields", &fields);
        self.render(FORM_TEMPLATE, &context)
    }

    /// Render the invoice list, in the order given
    pub fn render_list(&self, invoices: &[Invoice]) -> InvoiceResult<String> {
        let mut context = Context::new();
        context.insert("invoices", invoices);
        self.render(LIST_TEMPLATE, &context)
    }

    fn render(&self, template: &str, context: &Context) -> InvoiceResult<String> {
        self.tera
            .render(template, context)
            .map_err(|e| template_error(template, e).into())
    }
}

fn form_field<'a>(
    name: &'static str,
    label: &'static str,
    kind: &'static str,
    value: &'a String,
    errors: &'a BTreeMap<String, Vec<String>>,
) -> FormField<'a> {
    FormField {
        name,
        label,
        kind,
        value: value.as_str(),
        errors: errors.get(name).map(Vec::as_slice).unwrap_or(&[]),
    }
}

/// Tera keeps the useful part of the message in the source chain
fn template_error(template: &str, err: tera::Error) -> RenderingError {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(inner) = source {
        message = format!("{}: {}", message, inner);
        source = inner.source();
    }
    RenderingError::Template {
        template: template.to_string(),
        message,
    }
}
