pub mod palette;
pub mod passthrough;
pub mod sample_ring;

pub use palette::Palette;
pub use passthrough::{PassThrough, PlanarBlock};
pub use sample_ring::SampleRing;
