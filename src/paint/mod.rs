//! Shared painting primitives: text rendering, canvas compositing and axis
//! drawing. Plot elements delegate everything below the element level here.

pub mod axis;
pub mod compositor;
pub mod text;

pub use axis::add_axis;
pub use compositor::{center_element, center_element_in_place, Alignment};
pub use text::{
    allocate_numeric_text_space, allocate_text_space, generate_numeric_text, generate_text,
};
