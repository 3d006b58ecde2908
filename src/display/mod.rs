//! Display surfaces for progress output.
//!
//! Implement [`DisplaySurface`] to receive progress entries, or use one of
//! the provided surfaces: [`BufferSurface`], [`WriterSurface`], [`TracingSurface`].

mod surface;

pub use surface::{BufferSurface, DisplaySurface, LogLevel, TracingSurface, WriterSurface};
