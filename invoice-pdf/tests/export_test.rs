mod common;

use std::sync::mpsc;

use invoice_pdf::{
    CancelToken, CaptureError, ExportError, ExportJob, PdfReader, PngFileSurface, RasterImage,
    RenderSurface, Size,
};

use common::gray_png;

const PAGE: Size = Size::new(500.0, 700.0);

fn pdf_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "pdf"))
        .collect()
}

/// Surface whose capture cancels the export it belongs to.
struct CancellingSurface {
    image: RasterImage,
    token: CancelToken,
}

impl RenderSurface for CancellingSurface {
    fn capture(&self) -> Result<RasterImage, CaptureError> {
        self.token.cancel();
        Ok(self.image.clone())
    }
}

/// Surface whose capture waits until the test opens the gate.
struct GatedSurface {
    image: RasterImage,
    gate: mpsc::Receiver<()>,
}

impl RenderSurface for GatedSurface {
    fn capture(&self) -> Result<RasterImage, CaptureError> {
        let _ = self.gate.recv();
        Ok(self.image.clone())
    }
}

// -------------------------------------------------------
// Blocking run
// -------------------------------------------------------

#[test]
fn exports_one_page_per_slice() {
    let dir = tempfile::tempdir().unwrap();
    let capture = RasterImage::blank(1000, 2500, 255).unwrap();
    let job = ExportJob::new(dir.path()).with_page(PAGE);

    let report = job.run(&capture, &CancelToken::new()).unwrap();

    assert_eq!(report.page_count, 2);
    assert_eq!(report.scaled_height, 1250.0);
    assert_eq!(report.path.parent(), Some(dir.path()));
    assert_eq!(PdfReader::open(&report.path).unwrap().page_count(), 2);
}

#[test]
fn filename_is_timestamped() {
    let dir = tempfile::tempdir().unwrap();
    let capture = RasterImage::blank(10, 10, 0).unwrap();
    let report = ExportJob::new(dir.path()).run(&capture, &CancelToken::new()).unwrap();

    let name = report.path.file_name().unwrap().to_str().unwrap();
    let millis = name
        .strip_prefix("invoice_")
        .and_then(|rest| rest.strip_suffix(".pdf"))
        .unwrap();
    assert!(millis.parse::<i64>().unwrap() > 1_600_000_000_000);
}

#[test]
fn image_is_shared_and_offset_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let capture = RasterImage::blank(500, 2000, 128).unwrap();
    let report = ExportJob::new(dir.path())
        .with_page(PAGE)
        .run(&capture, &CancelToken::new())
        .unwrap();
    assert_eq!(report.page_count, 3);

    let bytes = std::fs::read(&report.path).unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert_eq!(output.matches("/Subtype /Image").count(), 1);
    // Image bottom edge per page: 700 - (offset + 2000).
    assert!(output.contains("500 0 0 2000 0 -1300 cm"));
    assert!(output.contains("500 0 0 2000 0 -600 cm"));
    assert!(output.contains("500 0 0 2000 0 100 cm"));
}

#[test]
fn exports_png_capture_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("capture.png");
    std::fs::write(&png, gray_png(100, 50)).unwrap();

    let out = dir.path().join("out");
    let report = ExportJob::new(&out)
        .run(&PngFileSurface::new(&png), &CancelToken::new())
        .unwrap();
    assert_eq!(report.page_count, 1);
    assert!(report.path.starts_with(&out));
}

#[test]
fn capture_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("capture.png");
    std::fs::write(&bad, b"not an image").unwrap();

    let err = ExportJob::new(dir.path())
        .run(&PngFileSurface::new(&bad), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, ExportError::Capture(CaptureError::Image(_))));
    assert!(pdf_files(dir.path()).is_empty());
}

#[test]
fn cancelled_before_start_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let token = CancelToken::new();
    token.cancel();
    let capture = RasterImage::blank(10, 10, 0).unwrap();

    let err = ExportJob::new(dir.path()).run(&capture, &token).unwrap_err();
    assert!(matches!(err, ExportError::Cancelled));
    assert!(pdf_files(dir.path()).is_empty());
}

#[test]
fn cancel_during_capture_stops_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let token = CancelToken::new();
    let surface = CancellingSurface {
        image: RasterImage::blank(500, 2000, 0).unwrap(),
        token: token.clone(),
    };

    let err = ExportJob::new(dir.path()).run(&surface, &token).unwrap_err();
    assert!(matches!(err, ExportError::Cancelled));
    assert!(pdf_files(dir.path()).is_empty());
}

// -------------------------------------------------------
// Spawned task
// -------------------------------------------------------

#[tokio::test]
async fn spawned_export_resolves_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let capture = RasterImage::blank(1000, 2500, 255).unwrap();

    let handle = ExportJob::new(dir.path()).with_page(PAGE).spawn(capture);
    let report = handle.join().await.unwrap();

    assert_eq!(report.page_count, 2);
    assert!(report.path.exists());
}

#[tokio::test]
async fn spawned_export_can_be_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let (open, gate) = mpsc::channel();
    let surface = GatedSurface {
        image: RasterImage::blank(500, 2000, 0).unwrap(),
        gate,
    };

    let handle = ExportJob::new(dir.path()).spawn(surface);
    handle.cancel();
    let _ = open.send(());
    let err = handle.join().await.unwrap_err();

    assert!(matches!(err, ExportError::Cancelled));
    assert!(pdf_files(dir.path()).is_empty());
}
