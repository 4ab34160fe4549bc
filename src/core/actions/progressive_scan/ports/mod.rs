pub mod block_painter;
pub mod colour_map;
pub mod escape_evaluator;
