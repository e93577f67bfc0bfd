use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::fonts::{BuiltinFont, TextStyle};
use crate::graphics::Color;
use crate::images::RasterImage;
use crate::objects::{ObjId, PdfObject};
use crate::writer::{encode_literal, format_number, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FONT_OBJ_NUM: u32 = 3;
const FIRST_FREE_OBJ_NUM: u32 = FIRST_FONT_OBJ_NUM + BuiltinFont::ALL.len() as u32;

/// Handle to an image written into a [`PdfDocument`]. The image data is
/// stored once and may be drawn on any number of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

impl ImageId {
    fn resource_name(&self) -> String {
        format!("Im{}", self.0 + 1)
    }
}

/// Builds a PDF incrementally.
///
/// Fonts and images are written as soon as they are registered, and each
/// page is flushed to the writer by `end_page()`, so memory use does not
/// grow with the page count.
///
/// Coordinates are PDF user space: points, bottom-left origin.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    image_obj_ids: Vec<ObjId>,
    current_page: Option<PageBuilder>,
    next_obj_num: u32,
}

struct PageBuilder {
    width: f64,
    height: f64,
    content: Vec<u8>,
    images: BTreeSet<ImageId>,
}

impl PdfDocument<BufWriter<File>> {
    /// Create a document that writes to a new file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> PdfDocument<W> {
    /// Start a document on `writer`. The header and the shared font
    /// objects are written immediately.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut pdf = PdfWriter::new(writer);
        pdf.write_header()?;

        for font in BuiltinFont::ALL {
            let obj = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.pdf_base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            pdf.write_object(font_obj(font), &obj)?;
        }

        Ok(PdfDocument {
            writer: pdf,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            image_obj_ids: Vec::new(),
            current_page: None,
            next_obj_num: FIRST_FREE_OBJ_NUM,
        })
    }

    /// Add a document info entry (e.g. "Title", "Creator").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Number of pages already closed.
    pub fn page_count(&self) -> usize {
        self.page_obj_ids.len()
    }

    pub fn has_open_page(&self) -> bool {
        self.current_page.is_some()
    }

    /// Open a new page of `width` × `height` points, closing any page
    /// that is still open.
    pub fn begin_page(&mut self, width: f64, height: f64) -> io::Result<&mut Self> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.current_page = Some(PageBuilder {
            width,
            height,
            content: Vec::new(),
            images: BTreeSet::new(),
        });
        Ok(self)
    }

    /// Height of the open page, if any.
    pub fn page_height(&self) -> Option<f64> {
        self.current_page.as_ref().map(|p| p.height)
    }

    fn page(&mut self) -> &mut PageBuilder {
        self.current_page
            .as_mut()
            .expect("content operation with no open page")
    }

    fn push_op(&mut self, op: &str) -> &mut Self {
        self.page().content.extend_from_slice(op.as_bytes());
        self
    }

    // ── text ─────────────────────────────────────────────────────────

    /// Place text at (x, y) in 12pt Helvetica.
    pub fn place_text(&mut self, text: &str, x: f64, y: f64) -> &mut Self {
        self.place_text_styled(text, x, y, &TextStyle::default())
    }

    /// Place text with its baseline starting at (x, y).
    ///
    /// # Panics
    /// Panics if no page is open.
    pub fn place_text_styled(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> &mut Self {
        let head = format!(
            "BT\n/{} {} Tf\n{} {} Td\n(",
            style.font.pdf_name(),
            format_number(style.font_size),
            format_number(x),
            format_number(y),
        );
        let page = self.page();
        page.content.extend_from_slice(head.as_bytes());
        page.content.extend_from_slice(&encode_literal(text));
        page.content.extend_from_slice(b") Tj\nET\n");
        self
    }

    // ── graphics state and paths ─────────────────────────────────────

    pub fn save_state(&mut self) -> &mut Self {
        self.push_op("q\n")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.push_op("Q\n")
    }

    pub fn set_fill_color(&mut self, c: Color) -> &mut Self {
        let op = format!(
            "{} {} {} rg\n",
            format_number(c.r),
            format_number(c.g),
            format_number(c.b)
        );
        self.push_op(&op)
    }

    pub fn set_stroke_color(&mut self, c: Color) -> &mut Self {
        let op = format!(
            "{} {} {} RG\n",
            format_number(c.r),
            format_number(c.g),
            format_number(c.b)
        );
        self.push_op(&op)
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        let op = format!("{} w\n", format_number(width));
        self.push_op(&op)
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let op = format!("{} {} m\n", format_number(x), format_number(y));
        self.push_op(&op)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        let op = format!("{} {} l\n", format_number(x), format_number(y));
        self.push_op(&op)
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.push_op("h\n")
    }

    /// Append a rectangle path; (x, y) is the bottom-left corner.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let op = format!(
            "{} {} {} {} re\n",
            format_number(x),
            format_number(y),
            format_number(width),
            format_number(height),
        );
        self.push_op(&op)
    }

    pub fn fill(&mut self) -> &mut Self {
        self.push_op("f\n")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.push_op("S\n")
    }

    pub fn fill_stroke(&mut self) -> &mut Self {
        self.push_op("B\n")
    }

    /// Intersect the clipping region with a rectangle. Wrap in
    /// `save_state`/`restore_state` to limit its scope.
    pub fn clip_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.rect(x, y, width, height);
        self.push_op("W n\n")
    }

    // ── images ───────────────────────────────────────────────────────

    /// Write `image` as a Flate-compressed image XObject (plus an SMask
    /// when it carries alpha) and return a handle for drawing it.
    pub fn add_image(&mut self, image: &RasterImage) -> io::Result<ImageId> {
        let smask = match &image.alpha {
            Some(alpha) => {
                let id = self.alloc_obj();
                let obj = PdfObject::flate_stream(
                    image_dict(image.width, image.height, "DeviceGray"),
                    alpha,
                )?;
                self.writer.write_object(id, &obj)?;
                Some(id)
            }
            None => None,
        };

        let mut dict = image_dict(image.width, image.height, image.color_space.pdf_name());
        if let Some(mask) = smask {
            dict.push(("SMask", PdfObject::Reference(mask)));
        }
        let id = self.alloc_obj();
        let obj = PdfObject::flate_stream(dict, &image.pixels)?;
        self.writer.write_object(id, &obj)?;

        self.image_obj_ids.push(id);
        Ok(ImageId(self.image_obj_ids.len() - 1))
    }

    /// Draw a registered image into the rectangle whose bottom-left
    /// corner is (x, y). Parts outside the page are cut by the viewer.
    ///
    /// # Panics
    /// Panics if no page is open or `image` was not returned by
    /// [`add_image`](Self::add_image) on this document.
    pub fn draw_image(
        &mut self,
        image: ImageId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> &mut Self {
        assert!(image.0 < self.image_obj_ids.len(), "unknown image {:?}", image);
        let op = format!(
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            format_number(width),
            format_number(height),
            format_number(x),
            format_number(y),
            image.resource_name(),
        );
        let page = self.page();
        page.images.insert(image);
        page.content.extend_from_slice(op.as_bytes());
        self
    }

    // ── pages and document ───────────────────────────────────────────

    /// Close the open page: write its content stream and page dictionary
    /// and release its buffered content.
    pub fn end_page(&mut self) -> io::Result<()> {
        let page = self.current_page.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "end_page called with no open page")
        })?;

        let content_id = self.alloc_obj();
        let page_id = self.alloc_obj();

        let content = PdfObject::stream(vec![], page.content);
        self.writer.write_object(content_id, &content)?;

        let fonts = BuiltinFont::ALL
            .iter()
            .map(|f| (f.pdf_name(), PdfObject::Reference(font_obj(*f))))
            .collect();
        let mut resources = vec![("Font", PdfObject::dict(fonts))];
        let xobject_names: Vec<(String, ObjId)> = page
            .images
            .iter()
            .map(|img| (img.resource_name(), self.image_obj_ids[img.0]))
            .collect();
        if !xobject_names.is_empty() {
            let entries = xobject_names
                .iter()
                .map(|(name, id)| (name.as_str(), PdfObject::Reference(*id)))
                .collect();
            resources.push(("XObject", PdfObject::dict(entries)));
        }

        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            ("MediaBox", PdfObject::page_box(page.width, page.height)),
            ("Contents", PdfObject::Reference(content_id)),
            ("Resources", PdfObject::dict(resources)),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_obj_ids.push(page_id);
        Ok(())
    }

    /// Finish the document: info dictionary, page tree, catalog, xref and
    /// trailer. Returns the underlying writer, flushed.
    pub fn end_document(mut self) -> io::Result<W> {
        if self.current_page.is_some() {
            self.end_page()?;
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc_obj();
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::literal_string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids = self
            .page_obj_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        self.writer.flush()?;
        Ok(self.writer.into_inner())
    }

    fn alloc_obj(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num, 0);
        self.next_obj_num += 1;
        id
    }
}

fn font_obj(font: BuiltinFont) -> ObjId {
    let index = BuiltinFont::ALL
        .iter()
        .position(|f| *f == font)
        .unwrap_or(0) as u32;
    ObjId(FIRST_FONT_OBJ_NUM + index, 0)
}

fn image_dict(width: u32, height: u32, color_space: &str) -> Vec<(&'static str, PdfObject)> {
    vec![
        ("Type", PdfObject::name("XObject")),
        ("Subtype", PdfObject::name("Image")),
        ("Width", PdfObject::Integer(width as i64)),
        ("Height", PdfObject::Integer(height as i64)),
        ("ColorSpace", PdfObject::name(color_space)),
        ("BitsPerComponent", PdfObject::Integer(8)),
    ]
}
