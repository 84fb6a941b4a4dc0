pub mod layout;
pub mod raster;

pub use raster::{render_quote_image, ExportOptions};
