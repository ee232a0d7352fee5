//! Invoice presentation: HTML through tera, then PDF through wkhtmltopdf

pub mod pdf;
pub mod template;

pub use pdf::{PdfRenderer, WkhtmltopdfRenderer, attachment_filename};
pub use template::TemplateRenderer;
