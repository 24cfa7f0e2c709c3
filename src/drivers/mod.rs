//! Light outputs, wake input and sleep controller.

pub mod hw_init;
pub mod lights;
pub mod sleep;
