use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use invoice_core::{InvoiceDraft, InvoiceForm, InvoiceView, PartyRole};
use invoice_pdf::{
    export_filename, render_preview, ExportError, ExportJob, PdfDocument, PdfReader,
    PngFileSurface,
};
use tracing::{info, warn};

use crate::config::AppConfig;

/// Read a draft and run its phone numbers through the form so stored
/// values lose any display prefix and get validated.
pub fn load_form(path: &Path, config: &AppConfig) -> Result<InvoiceForm> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("cannot read draft {}", path.display()))?;
    let draft = InvoiceDraft::from_json(&json)
        .with_context(|| format!("cannot parse draft {}", path.display()))?;

    let phones = [
        (PartyRole::Buyer, draft.buyer.phone.clone()),
        (PartyRole::Seller, draft.seller.phone.clone()),
    ];
    let mut form = InvoiceForm::with_draft(draft, config.display_settings());
    for (role, phone) in phones {
        if !phone.is_empty() {
            form.set_party_phone(role, &phone);
        }
    }
    Ok(form)
}

/// Text summary of a draft's totals plus any phone warnings.
pub fn totals_report(form: &InvoiceForm) -> String {
    let settings = form.settings();
    let draft = form.draft();
    let totals = form.totals();

    let mut out = format!(
        "Invoice {} ({}, {})\n",
        draft.invoice_number, draft.date, draft.status
    );
    for (label, value) in [
        ("Subtotal", totals.subtotal),
        ("Discount", totals.discount),
        ("Tax", totals.tax),
        ("Total", totals.total),
    ] {
        out.push_str(&format!("{:<10}{:>14}\n", label, settings.money(value)));
    }
    for role in [PartyRole::Seller, PartyRole::Buyer] {
        if let Some(message) = form.phone_error_message(role) {
            out.push_str(&format!("warning: {} phone: {}\n", role, message));
        }
    }
    out
}

pub fn totals(draft: &Path, json: bool, config: &AppConfig) -> Result<()> {
    let form = load_form(draft, config)?;
    for role in [PartyRole::Seller, PartyRole::Buyer] {
        if form.phone_error(role) {
            warn!(%role, "invalid phone number");
        }
    }
    if json {
        let view: InvoiceView = form.view();
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", totals_report(&form));
    }
    Ok(())
}

/// Default preview path: next to the exports, named like them.
fn preview_path(config: &AppConfig, now: DateTime<Utc>) -> PathBuf {
    config.output_dir.join(export_filename(now))
}

pub fn preview(draft: &Path, output: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    let form = load_form(draft, config)?;
    let path = output.unwrap_or_else(|| preview_path(config, Utc::now()));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }

    let mut doc = PdfDocument::create(&path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    doc.set_info("Title", &format!("Invoice {}", form.draft().invoice_number));
    doc.set_info("Creator", &config.business_name);
    render_preview(&mut doc, form.draft(), &config.preview_style())?;
    doc.end_document()?;

    info!(path = %path.display(), "preview written");
    println!("{}", path.display());
    Ok(path)
}

/// Export a captured preview. Ctrl-C cancels the running export.
pub async fn export(
    capture: &Path,
    out_dir: Option<PathBuf>,
    config: &AppConfig,
) -> Result<PathBuf> {
    let job = ExportJob::new(out_dir.unwrap_or_else(|| config.output_dir.clone()))
        .with_page(config.page_size())
        .with_title(config.business_name.clone());
    let handle = job.spawn(PngFileSurface::new(capture));
    let cancel = handle.cancel_token();

    let join = handle.join();
    tokio::pin!(join);
    let result = tokio::select! {
        result = &mut join => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupt received, cancelling export");
            cancel.cancel();
            join.await
        }
    };

    match result {
        Ok(report) => {
            println!(
                "{} ({} page{})",
                report.path.display(),
                report.page_count,
                if report.page_count == 1 { "" } else { "s" }
            );
            Ok(report.path)
        }
        Err(ExportError::Cancelled) => bail!("export cancelled"),
        Err(e) => Err(e).with_context(|| format!("cannot export {}", capture.display())),
    }
}

pub fn inspect(file: &Path) -> Result<()> {
    let reader = PdfReader::open(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    println!("PDF version: {}", reader.pdf_version());
    println!("Pages: {}", reader.page_count());
    Ok(())
}
