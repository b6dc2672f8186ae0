//! Form tree, request state and rendering

pub mod element;
pub mod render;
pub mod state;

pub use element::{ElementKind, FormElement, SelectOption};
pub use render::{escape_html, render_html, render_inline_template};
pub use state::{DEFAULT_PARENT, FormState};
