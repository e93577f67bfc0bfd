use invoice_pdf::{PdfDocument, PdfReadError, PdfReader};

fn make_pdf(pages: usize) -> Vec<u8> {
    let mut doc = PdfDocument::new(Vec::new()).unwrap();
    doc.set_info("Title", "Invoice (draft)");
    for _ in 0..pages {
        doc.begin_page(595.28, 841.89).unwrap();
        doc.place_text("page", 40.0, 800.0);
        doc.end_page().unwrap();
    }
    doc.end_document().unwrap()
}

#[test]
fn counts_pages() {
    for pages in [0, 1, 3] {
        let reader = PdfReader::from_bytes(&make_pdf(pages)).unwrap();
        assert_eq!(reader.page_count(), pages);
    }
}

#[test]
fn reports_version() {
    let reader = PdfReader::from_bytes(&make_pdf(1)).unwrap();
    assert_eq!(reader.pdf_version(), "1.7");
}

#[test]
fn opens_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    std::fs::write(&path, make_pdf(2)).unwrap();
    assert_eq!(PdfReader::open(&path).unwrap().page_count(), 2);
}

#[test]
fn truncated_file_fails() {
    let bytes = make_pdf(1);
    let result = PdfReader::from_bytes(&bytes[..bytes.len() / 2]);
    assert!(matches!(result, Err(PdfReadError::StartxrefNotFound)));
}

#[test]
fn missing_file_is_io_error() {
    let result = PdfReader::open("/nonexistent/out.pdf");
    assert!(matches!(result, Err(PdfReadError::Io(_))));
}

/// A header-only PDF whose xref is `subsection` followed by `entries`.
fn pdf_with_xref(subsection: &str, entries: usize) -> Vec<u8> {
    let mut pdf = b"%PDF-1.7\n".to_vec();
    let xref_offset = pdf.len();
    pdf.extend_from_slice(format!("xref\n{subsection}\n").as_bytes());
    for _ in 0..entries {
        pdf.extend_from_slice(b"0000000009 00000 n\r\n");
    }
    pdf.extend_from_slice(b"trailer\n<< /Size 2 /Root 1 0 R >>\n");
    pdf.extend_from_slice(format!("startxref\n{xref_offset}\n%%EOF\n").as_bytes());
    pdf
}

#[test]
fn object_number_overflow_is_malformed_xref() {
    let result = PdfReader::from_bytes(&pdf_with_xref("4294967295 2", 2));
    assert!(matches!(result, Err(PdfReadError::MalformedXref)));
}

#[test]
fn entry_count_overflow_is_malformed_xref() {
    let subsection = format!("0 {}", usize::MAX / 4);
    let result = PdfReader::from_bytes(&pdf_with_xref(&subsection, 1));
    assert!(matches!(result, Err(PdfReadError::MalformedXref)));
}

#[test]
fn entry_count_past_end_is_malformed_xref() {
    let result = PdfReader::from_bytes(&pdf_with_xref("0 5", 2));
    assert!(matches!(result, Err(PdfReadError::MalformedXref)));
}
