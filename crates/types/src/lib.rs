pub mod color;
pub mod geometry;
pub mod image;
pub mod record;

pub use color::Color;
pub use geometry::{GeometryError, PageGeometry, Rect, Size};
pub use image::RasterImage;
pub use record::{HistoryEvent, Package, ShipmentRecord, ShipmentStatus};
