pub mod objects;
pub mod writer;
pub mod document;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod paginate;
pub mod preview;
pub mod export;
pub mod reader;

pub use document::{ImageId, PdfDocument};
pub use export::{
    export_filename, CancelToken, CaptureError, ExportError, ExportHandle, ExportJob,
    ExportReport, PngFileSurface, RenderSurface,
};
pub use fonts::{BuiltinFont, TextStyle};
pub use graphics::Color;
pub use images::{ColorSpace, ImageError, RasterImage};
pub use paginate::{paginate, PageSlice, PaginateError, Pagination, Size, MAX_PAGES};
pub use preview::{render_preview, PreviewStyle};
pub use reader::{PdfReadError, PdfReader};
