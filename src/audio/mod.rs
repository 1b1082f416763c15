// Audio module - contains file detection, bitrate probing, and metadata reconciliation

pub mod detection;
pub mod metadata;
pub mod probe;

pub use detection::is_m4a_file;
pub use metadata::reconcile_metadata;
pub use probe::{probe_bitrate, DEFAULT_BITRATE};
