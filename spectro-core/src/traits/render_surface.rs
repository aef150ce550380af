use crate::render::raster::RasterBuffer;

/// Presentation target supplied by the embedding layer.
///
/// The session's render loop polls `dimensions()` every refresh tick and
/// resizes the waterfall when they change, then hands the composited frame
/// to `present`. Implementations typically blit the RGBA bytes to a window
/// or canvas.
pub trait RenderSurface: Send + Sync {
    /// Current pixel dimensions of the drawing area.
    fn dimensions(&self) -> (u32, u32);

    /// Present one completed frame. Called once per refresh tick from the
    /// render thread; also called with a cleared frame when capture stops.
    fn present(&self, frame: &RasterBuffer);
}
