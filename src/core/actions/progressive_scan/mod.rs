pub mod ports;
#[allow(clippy::module_inception)]
pub mod progressive_scan;
