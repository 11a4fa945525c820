pub mod chrome_renderer;
pub mod pdf;

pub use chrome_renderer::{ChromePdfRenderer, RasterImage};
pub use pdf::{paginate, PageLayout, PdfRenderer, PdfSettings};
