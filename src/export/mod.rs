/// Export backends: PNG frames, JSON frame metadata and diagnostic images.
pub mod diagnostics;
pub mod json;
pub mod png;

pub use diagnostics::{export_height_map, export_noise_table};
pub use json::{FrameInfo, export_frame_info};
pub use png::save_frame;
