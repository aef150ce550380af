//! Scrolling waterfall composition.
//!
//! Each draw appends the newest spectrum as the rightmost column: low
//! frequencies at the bottom, high at the top, color from the shared
//! palette. Time scrolls left, oldest column discarded first.

use crate::models::spectrum::MagnitudeSpectrum;
use crate::processing::palette::Palette;
use crate::render::raster::RasterBuffer;
use crate::traits::spectrum_source::SpectrumSource;

pub struct WaterfallRenderer {
    raster: RasterBuffer,
    palette: Palette,
    /// Reused per-frame scratch; sized on first draw.
    spectrum: MagnitudeSpectrum,
    column: Vec<[u8; 4]>,
}

impl WaterfallRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let raster = RasterBuffer::new(width, height);
        let column = vec![[0, 0, 0, 255]; raster.height() as usize];
        Self {
            raster,
            palette: Palette::build(),
            spectrum: MagnitudeSpectrum::zeroed(0),
            column,
        }
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.raster.width(), self.raster.height())
    }

    /// Adopt new surface dimensions, discarding scrollback. Degenerate
    /// dimensions are clamped, never an error.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.raster.resize(width, height);
        self.column
            .resize(self.raster.height() as usize, [0, 0, 0, 255]);
    }

    /// Reset the image to blank (used whenever capture is not running).
    pub fn clear(&mut self) {
        self.raster.clear();
    }

    /// One display-refresh tick: scroll left, poll the source, paint the
    /// newest column on the right edge.
    pub fn draw_frame(&mut self, source: &dyn SpectrumSource) {
        source.read_into(&mut self.spectrum);

        self.raster.shift_left();

        let height = self.raster.height();
        let bins = self.spectrum.len();
        for y in 0..height {
            let bin = bin_for_row(y, height, bins);
            let [r, g, b] = self.palette.color(self.spectrum.bin(bin));
            self.column[y as usize] = [r, g, b, 255];
        }
        self.raster.write_column(self.raster.width() - 1, &self.column);
    }
}

/// Map an output row to a frequency bin, inverted so the highest frequency
/// renders at the top row. A height of 1 renders the top bin.
pub fn bin_for_row(y: u32, height: u32, bin_count: usize) -> usize {
    if bin_count == 0 {
        return 0;
    }
    let t = if height > 1 {
        1.0 - y as f32 / (height - 1) as f32
    } else {
        1.0
    };
    ((t * bin_count as f32) as usize).min(bin_count - 1)
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    /// Synthetic source: each read produces a fresh ramp offset by the tick
    /// number, so every column is distinguishable.
    struct RampSource {
        bins: usize,
        tick: Mutex<u64>,
    }

    impl RampSource {
        fn new(bins: usize) -> Self {
            Self {
                bins,
                tick: Mutex::new(0),
            }
        }
    }

    impl SpectrumSource for RampSource {
        fn bin_count(&self) -> usize {
            self.bins
        }

        fn read_into(&self, out: &mut MagnitudeSpectrum) {
            if out.len() != self.bins {
                out.reset(self.bins);
            }
            let mut tick = self.tick.lock();
            for (bin, value) in out.as_mut_slice().iter_mut().enumerate() {
                *value = (*tick as usize).wrapping_add(bin) as u8;
            }
            *tick += 1;
        }
    }

    /// The column `draw_frame` paints for a given tick of `RampSource`.
    fn expected_column(tick: u64, height: u32, bins: usize, palette: &Palette) -> Vec<[u8; 4]> {
        (0..height)
            .map(|y| {
                let bin = bin_for_row(y, height, bins);
                let magnitude = (tick as usize).wrapping_add(bin) as u8;
                let [r, g, b] = palette.color(magnitude);
                [r, g, b, 255]
            })
            .collect()
    }

    #[test]
    fn row_mapping_is_inverted() {
        // Top row shows the highest bin, bottom row bin 0.
        assert_eq!(bin_for_row(0, 512, 512), 511);
        assert_eq!(bin_for_row(511, 512, 512), 0);
        // Interior rows walk the range monotonically.
        assert!(bin_for_row(100, 512, 512) > bin_for_row(400, 512, 512));
    }

    #[test]
    fn height_of_one_picks_the_top_bin() {
        assert_eq!(bin_for_row(0, 1, 512), 511);
    }

    #[test]
    fn mapping_survives_mismatched_bin_counts() {
        assert_eq!(bin_for_row(0, 4, 0), 0);
        for y in 0..4 {
            assert!(bin_for_row(y, 4, 7) < 7);
        }
    }

    #[test]
    fn columns_scroll_in_chronological_order() {
        let width = 8u32;
        let height = 4u32;
        let mut renderer = WaterfallRenderer::new(width, height);
        let source = RampSource::new(16);
        let palette = Palette::build();

        let draws = 20u64;
        for _ in 0..draws {
            renderer.draw_frame(&source);
        }

        // Column width-1-k holds the (draws-k)-th drawn column.
        for k in 0..width as u64 {
            let expected = expected_column(draws - 1 - k, height, 16, &palette);
            assert_eq!(renderer.raster().column(width - 1 - k as u32), expected);
        }
    }

    #[test]
    fn resize_discards_scrollback() {
        let mut renderer = WaterfallRenderer::new(6, 3);
        let source = RampSource::new(8);
        for _ in 0..10 {
            renderer.draw_frame(&source);
        }

        renderer.resize(9, 5);
        assert_eq!(renderer.dimensions(), (9, 5));
        assert!(renderer
            .raster()
            .as_bytes()
            .chunks_exact(4)
            .all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn degenerate_resize_is_clamped() {
        let mut renderer = WaterfallRenderer::new(6, 3);
        renderer.resize(0, 0);
        assert_eq!(renderer.dimensions(), (1, 1));

        // And drawing at the clamped size still works.
        let source = RampSource::new(8);
        renderer.draw_frame(&source);
    }

    #[test]
    fn full_buffer_keeps_scrolling_without_fault() {
        // 600 ticks against a 300-column surface: the buffer is full from
        // tick 300 on and must keep strict chronological order after that.
        let width = 300u32;
        let height = 16u32;
        let mut renderer = WaterfallRenderer::new(width, height);
        let source = RampSource::new(32);
        let palette = Palette::build();

        let draws = 600u64;
        for _ in 0..draws {
            renderer.draw_frame(&source);
        }

        for k in 0..width as u64 {
            let expected = expected_column(draws - 1 - k, height, 32, &palette);
            assert_eq!(renderer.raster().column(width - 1 - k as u32), expected);
        }
    }
}
