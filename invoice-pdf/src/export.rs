//! Exporting a captured invoice preview as a multi-page PDF.
//!
//! The capture is one tall raster. It is scaled to the page width, split
//! into page-sized slices by [`paginate`], and written with the image
//! stored once and drawn on every page at that page's offset.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

use crate::document::PdfDocument;
use crate::images::{ImageError, RasterImage};
use crate::paginate::{paginate, PaginateError, Pagination, Size};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot capture preview: {0}")]
    Image(#[from] ImageError),
    #[error("preview has not been rendered")]
    NotRendered,
}

/// Something that can rasterize the rendered invoice preview.
pub trait RenderSurface {
    fn capture(&self) -> Result<RasterImage, CaptureError>;
}

/// A preview already captured to a PNG file.
#[derive(Debug, Clone)]
pub struct PngFileSurface {
    path: PathBuf,
}

impl PngFileSurface {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        PngFileSurface { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RenderSurface for PngFileSurface {
    fn capture(&self) -> Result<RasterImage, CaptureError> {
        if !self.path.exists() {
            return Err(CaptureError::NotRendered);
        }
        Ok(RasterImage::from_png_file(&self.path)?)
    }
}

impl RenderSurface for RasterImage {
    fn capture(&self) -> Result<RasterImage, CaptureError> {
        Ok(self.clone())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Paginate(#[from] PaginateError),
    #[error("cannot write PDF: {0}")]
    Io(#[from] std::io::Error),
    #[error("export cancelled")]
    Cancelled,
    #[error("export task failed: {0}")]
    Task(#[from] JoinError),
}

/// Shared flag for stopping an export between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ExportError> {
        if self.is_cancelled() {
            Err(ExportError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Outcome of a finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub page_count: usize,
    /// Height of the capture after scaling to the page width, in points.
    pub scaled_height: f64,
}

/// `invoice_<unix-millis>.pdf`
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("invoice_{}.pdf", at.timestamp_millis())
}

/// Settings for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub page: Size,
    pub output_dir: PathBuf,
    /// Written to the document info dictionary.
    pub title: String,
}

impl ExportJob {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        ExportJob {
            page: Size::A4,
            output_dir: output_dir.into(),
            title: "Invoice".to_string(),
        }
    }

    pub fn with_page(mut self, page: Size) -> Self {
        self.page = page;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Capture, paginate and save, blocking the calling thread.
    ///
    /// The token is checked between stages and before each page. On any
    /// failure, including cancellation, a partially written file is removed.
    pub fn run(
        &self,
        surface: &dyn RenderSurface,
        cancel: &CancelToken,
    ) -> Result<ExportReport, ExportError> {
        let result = self.export(surface, cancel);
        match &result {
            Ok(report) => info!(
                path = %report.path.display(),
                pages = report.page_count,
                "invoice exported"
            ),
            Err(ExportError::Cancelled) => info!("invoice export cancelled"),
            Err(e) => error!(error = %e, "invoice export failed"),
        }
        result
    }

    /// Run the export on tokio's blocking pool. Must be called from within
    /// a tokio runtime.
    pub fn spawn<S>(self, surface: S) -> ExportHandle
    where
        S: RenderSurface + Send + 'static,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let task = tokio::task::spawn_blocking(move || self.run(&surface, &token));
        ExportHandle { cancel, task }
    }

    fn export(
        &self,
        surface: &dyn RenderSurface,
        cancel: &CancelToken,
    ) -> Result<ExportReport, ExportError> {
        cancel.check()?;
        let image = surface.capture()?;
        debug!(
            width = image.width,
            height = image.height,
            "captured invoice preview"
        );

        cancel.check()?;
        let pagination = paginate(image.size(), self.page)?;

        cancel.check()?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(export_filename(Utc::now()));
        if let Err(e) = self.write_pdf(&path, &image, &pagination, cancel) {
            if path.exists() {
                if let Err(rm) = fs::remove_file(&path) {
                    error!(path = %path.display(), error = %rm, "cannot remove partial export");
                }
            }
            return Err(e);
        }

        Ok(ExportReport {
            path,
            page_count: pagination.page_count(),
            scaled_height: pagination.scaled.height,
        })
    }

    fn write_pdf(
        &self,
        path: &Path,
        image: &RasterImage,
        pagination: &Pagination,
        cancel: &CancelToken,
    ) -> Result<(), ExportError> {
        let page = self.page;
        let scaled = pagination.scaled;

        let mut doc = PdfDocument::create(path)?;
        doc.set_info("Title", &self.title);
        let id = doc.add_image(image)?;
        for slice in &pagination.slices {
            cancel.check()?;
            // Slice offsets are measured downward from the page top; PDF
            // places the image by its bottom-left corner.
            let y = page.height - (slice.offset + scaled.height);
            doc.begin_page(page.width, page.height)?;
            doc.draw_image(id, 0.0, y, scaled.width, scaled.height);
            doc.end_page()?;
        }
        doc.end_document()?;
        Ok(())
    }
}

/// A running export. Dropping the handle detaches the task; it still runs
/// to completion and logs its outcome.
#[derive(Debug)]
pub struct ExportHandle {
    cancel: CancelToken,
    task: JoinHandle<Result<ExportReport, ExportError>>,
}

impl ExportHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub async fn join(self) -> Result<ExportReport, ExportError> {
        self.task.await?
    }
}
