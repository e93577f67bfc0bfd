use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// Errors from reading back a PDF.
#[derive(Debug, Error)]
pub enum PdfReadError {
    #[error("not a PDF file")]
    NotAPdf,
    #[error("startxref not found")]
    StartxrefNotFound,
    #[error("malformed or missing xref table")]
    MalformedXref,
    #[error("malformed or missing trailer")]
    MalformedTrailer,
    #[error("cross-reference streams are not supported")]
    XrefStreamNotSupported,
    #[error("cannot resolve object {0}")]
    UnresolvableObject(u32),
    #[error("malformed page tree")]
    MalformedPageTree,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal reader for classic-xref PDFs such as the ones this crate
/// writes. It resolves the catalog and page tree to report the page count.
#[derive(Debug)]
pub struct PdfReader {
    version: String,
    page_count: usize,
}

impl PdfReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PdfReadError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, PdfReadError> {
        let version = parse_version(data)?;
        let xref_offset = find_startxref(data)?;
        let section = &data[xref_offset..];
        if !trim_ws(section).starts_with(b"xref") {
            return Err(PdfReadError::XrefStreamNotSupported);
        }
        let xref = parse_xref_table(section)?;
        let trailer = parse_trailer(section)?;
        let root = trailer
            .get("Root")
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or(PdfReadError::MalformedTrailer)?;

        let catalog = resolve_dict(data, &xref, root)?;
        let pages = catalog
            .get("Pages")
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or(PdfReadError::MalformedPageTree)?;
        let page_tree = resolve_dict(data, &xref, pages)?;
        let page_count = page_tree
            .get("Count")
            .and_then(|v| v.parse::<usize>().ok())
            .ok_or(PdfReadError::MalformedPageTree)?;

        Ok(PdfReader {
            version,
            page_count,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Version from the `%PDF-x.y` header.
    pub fn pdf_version(&self) -> &str {
        &self.version
    }
}

fn parse_version(data: &[u8]) -> Result<String, PdfReadError> {
    let rest = data.strip_prefix(b"%PDF-").ok_or(PdfReadError::NotAPdf)?;
    let end = rest
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(rest.len());
    let version = std::str::from_utf8(&rest[..end]).map_err(|_| PdfReadError::NotAPdf)?;
    if version.is_empty() {
        return Err(PdfReadError::NotAPdf);
    }
    Ok(version.to_string())
}

/// The `startxref` keyword sits within the last kilobyte of the file.
fn find_startxref(data: &[u8]) -> Result<usize, PdfReadError> {
    let tail_start = data.len().saturating_sub(1024);
    let tail = &data[tail_start..];
    let keyword = b"startxref";
    let pos = tail
        .windows(keyword.len())
        .rposition(|w| w == keyword)
        .ok_or(PdfReadError::StartxrefNotFound)?;
    let (token, _) = next_token(&tail[pos + keyword.len()..])
        .ok_or(PdfReadError::StartxrefNotFound)?;
    let offset: usize = token.parse().map_err(|_| PdfReadError::StartxrefNotFound)?;
    if offset >= data.len() {
        return Err(PdfReadError::StartxrefNotFound);
    }
    Ok(offset)
}

/// Parse xref subsections of fixed 20-byte entries into object offsets.
fn parse_xref_table(section: &[u8]) -> Result<HashMap<u32, usize>, PdfReadError> {
    const ENTRY: usize = 20;
    let mut offsets = HashMap::new();
    let mut cursor = &trim_ws(section)[b"xref".len()..];

    loop {
        cursor = trim_ws(cursor);
        if cursor.is_empty() || cursor.starts_with(b"trailer") {
            break;
        }
        let (first, rest) = next_token(cursor).ok_or(PdfReadError::MalformedXref)?;
        let (count, rest) = next_token(rest).ok_or(PdfReadError::MalformedXref)?;
        let first: u32 = first.parse().map_err(|_| PdfReadError::MalformedXref)?;
        let count: usize = count.parse().map_err(|_| PdfReadError::MalformedXref)?;

        let newline = rest
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(PdfReadError::MalformedXref)?;
        let entries = &rest[newline + 1..];
        let len = count
            .checked_mul(ENTRY)
            .filter(|&len| len <= entries.len())
            .ok_or(PdfReadError::MalformedXref)?;
        for (i, entry) in entries[..len].chunks_exact(ENTRY).enumerate() {
            if entry[17] != b'n' {
                continue;
            }
            let offset = std::str::from_utf8(&entry[..10])
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or(PdfReadError::MalformedXref)?;
            let num = u32::try_from(i)
                .ok()
                .and_then(|i| first.checked_add(i))
                .ok_or(PdfReadError::MalformedXref)?;
            offsets.insert(num, offset);
        }
        cursor = &entries[len..];
    }
    Ok(offsets)
}

fn parse_trailer(section: &[u8]) -> Result<HashMap<String, String>, PdfReadError> {
    let keyword = b"trailer";
    let pos = section
        .windows(keyword.len())
        .position(|w| w == keyword)
        .ok_or(PdfReadError::MalformedTrailer)?;
    parse_dict(&section[pos + keyword.len()..]).ok_or(PdfReadError::MalformedTrailer)
}

fn resolve_dict(
    data: &[u8],
    xref: &HashMap<u32, usize>,
    num: u32,
) -> Result<HashMap<String, String>, PdfReadError> {
    let offset = *xref.get(&num).ok_or(PdfReadError::UnresolvableObject(num))?;
    let body = data
        .get(offset..)
        .and_then(skip_obj_header)
        .ok_or(PdfReadError::UnresolvableObject(num))?;
    parse_dict(body).ok_or(PdfReadError::UnresolvableObject(num))
}

/// Flat view of a `<< ... >>` dictionary: each key maps to the first token
/// of its value, with names stripped of their slash and `N G R` references
/// reduced to `N`. Nested dictionaries, arrays and strings are skipped.
fn parse_dict(data: &[u8]) -> Option<HashMap<String, String>> {
    let mut cursor = trim_ws(data).strip_prefix(b"<<")?;
    let mut map = HashMap::new();
    loop {
        cursor = trim_ws(cursor);
        if cursor.is_empty() {
            return None;
        }
        if cursor.starts_with(b">>") {
            return Some(map);
        }
        let Some(after_slash) = cursor.strip_prefix(b"/") else {
            let (_, rest) = next_token(cursor)?;
            cursor = rest;
            continue;
        };
        let (key, rest) = next_token(after_slash)?;
        let key = key.to_string();
        cursor = trim_ws(rest);

        match cursor.first()? {
            b'<' if cursor.starts_with(b"<<") => cursor = skip_balanced(cursor, b"<<", b">>")?,
            b'[' => cursor = skip_balanced(cursor, b"[", b"]")?,
            b'(' => cursor = skip_balanced(cursor, b"(", b")")?,
            b'/' => {
                let (name, rest) = next_token(&cursor[1..])?;
                map.insert(key, name.to_string());
                cursor = rest;
            }
            _ => {
                let (value, rest) = next_token(cursor)?;
                map.insert(key, value.to_string());
                cursor = rest;
                // Swallow the "G R" tail of an indirect reference.
                if let Some((gen, after_gen)) = next_token(cursor) {
                    if let Some(("R", after_r)) = next_token(after_gen) {
                        if gen.bytes().all(|b| b.is_ascii_digit()) {
                            cursor = after_r;
                        }
                    }
                }
            }
        }
    }
}

/// Skip a bracketed construct, honoring nesting and backslash escapes.
fn skip_balanced<'a>(data: &'a [u8], open: &[u8], close: &[u8]) -> Option<&'a [u8]> {
    let mut depth = 0usize;
    let mut i = 0;
    while i < data.len() {
        if data[i] == b'\\' {
            i += 2;
        } else if data[i..].starts_with(open) {
            depth += 1;
            i += open.len();
        } else if data[i..].starts_with(close) {
            depth -= 1;
            i += close.len();
            if depth == 0 {
                return Some(&data[i..]);
            }
        } else {
            i += 1;
        }
    }
    None
}

fn skip_obj_header(data: &[u8]) -> Option<&[u8]> {
    let (_, rest) = next_token(data)?;
    let (_, rest) = next_token(rest)?;
    match next_token(rest)? {
        ("obj", rest) => Some(rest),
        _ => None,
    }
}

fn trim_ws(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

/// Next whitespace- or delimiter-separated token.
fn next_token(data: &[u8]) -> Option<(&str, &[u8])> {
    let data = trim_ws(data);
    if data.is_empty() {
        return None;
    }
    let is_delim = |b: &u8| {
        b.is_ascii_whitespace() || matches!(b, b'<' | b'>' | b'/' | b'[' | b']' | b'(' | b')')
    };
    let end = match data.iter().position(is_delim) {
        Some(0) => 1,
        Some(n) => n,
        None => data.len(),
    };
    let token = std::str::from_utf8(&data[..end]).ok()?;
    Some((token, &data[end..]))
}
