//! HTML to PDF conversion
//!
//! [`PdfRenderer`] is the seam between the web layer and the converter so
//! handlers can be exercised without a real `wkhtmltopdf` on the machine.
//! [`WkhtmltopdfRenderer`] pipes the HTML through the external binary:
//!
//! ```text
//! html ──stdin──▶ wkhtmltopdf --quiet - - ──stdout──▶ pdf bytes
//! ```
//!
//! Each conversion is a child process. A semaphore caps how many run at
//! once and every run has a deadline, after which the child is killed.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::core::error::{InvoiceResult, RenderingError};

/// Converts an HTML document into PDF bytes
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> InvoiceResult<Vec<u8>>;
}

/// File name offered for an invoice download
pub fn attachment_filename(invoice_no: &str) -> String {
    format!("Invoice-{}.pdf", invoice_no)
}

/// PDF renderer shelling out to `wkhtmltopdf`
#[derive(Clone, Debug)]
pub struct WkhtmltopdfRenderer {
    program: PathBuf,
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl WkhtmltopdfRenderer {
    /// `max_concurrent` must be at least 1
    pub fn new(program: impl Into<PathBuf>, max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    async fn convert(&self, html: Vec<u8>) -> InvoiceResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(["--quiet", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RenderingError::Spawn {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        // Feed stdin concurrently so a full stdout pipe cannot stall the child
        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&html).await {
                    tracing::debug!(error = %e, "wkhtmltopdf closed stdin early");
                }
            });
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderingError::Timeout {
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| RenderingError::Spawn {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RenderingError::ConverterFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        if output.stdout.is_empty() {
            return Err(RenderingError::EmptyOutput.into());
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    async fn render(&self, html: &str) -> InvoiceResult<Vec<u8>> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| RenderingError::Spawn {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        let started = std::time::Instant::now();
        let pdf = self.convert(html.as_bytes().to_vec()).await?;
        tracing::debug!(
            bytes = pdf.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered PDF"
        );
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::InvoiceError;

    #[test]
    fn test_attachment_filename() {
        assert_eq!(attachment_filename("INV0001"), "Invoice-INV0001.pdf");
    }

    #[tokio::test]
    async fn test_missing_binary_is_rendering_error() {
        let renderer = WkhtmltopdfRenderer::new(
            "/nonexistent/bin/wkhtmltopdf",
            1,
            Duration::from_secs(5),
        );
        let err = renderer.render("<html></html>").await.unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::Rendering(RenderingError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_converter_reports_exit_status() {
        let renderer = WkhtmltopdfRenderer::new("false", 1, Duration::from_secs(5));
        let err = renderer.render("<html></html>").await.unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::Rendering(RenderingError::ConverterFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_silent_converter_is_empty_output() {
        let renderer = WkhtmltopdfRenderer::new("true", 1, Duration::from_secs(5));
        let err = renderer.render("<html></html>").await.unwrap_err();
        assert!(matches!(
            err,
            InvoiceError::Rendering(RenderingError::EmptyOutput)
        ));
    }

    #[test]
    fn test_zero_concurrency_still_allows_one_render() {
        let renderer = WkhtmltopdfRenderer::new("wkhtmltopdf", 0, Duration::from_secs(1));
        assert_eq!(renderer.permits.available_permits(), 1);
    }
}
