// Style overlay DSL parser

pub mod labels;
pub mod lexer;
pub mod pipeline;
pub mod theme;

// Public API re-exports
pub use pipeline::{parse_style, parse_style_spec};
