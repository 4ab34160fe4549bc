pub mod colour;
pub mod complex;
pub mod complex_window;
pub mod escape_result;
pub mod pixel_block;
pub mod pixel_buffer;
pub mod viewport;
