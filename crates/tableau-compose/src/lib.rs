//! # tableau-compose
//!
//! The Tableau scene composer. Lays out elements relative to each other,
//! sequences them into a timeline and drives a rendering engine through the
//! [`Renderer`] capability trait. Rendering itself lives outside this crate;
//! [`RecordingRenderer`] stands in for it in tests and dry runs.

pub mod composer;
pub mod field;
pub mod interpret;
pub mod recorder;
pub mod renderer;
pub mod runner;

pub use composer::{Composer, Composition, ElementHandle};
pub use interpret::{interpret, interpret_file, interpret_with};
pub use recorder::{RecordingRenderer, RenderCall};
pub use renderer::Renderer;
pub use runner::{run, RunReport};
