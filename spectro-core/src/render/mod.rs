pub mod raster;
pub mod waterfall;

pub use raster::RasterBuffer;
pub use waterfall::WaterfallRenderer;
