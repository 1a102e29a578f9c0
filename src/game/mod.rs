pub mod carousel;
pub mod session;

pub use carousel::SphereCarousel;
pub use session::{FrameReport, SphereSession};
