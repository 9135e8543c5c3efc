mod cast;
mod error;
mod render;

pub use {
    cast::to_planes,
    error::Error,
    render::{Frame, Matrix, Tint, create_image, render},
};
