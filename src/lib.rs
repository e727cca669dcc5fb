// Library exports for chartforge

pub mod data;
pub mod errors;
pub mod parser;
pub mod recommend;

// Engine Modules
pub mod ir;
pub mod resolve;
pub mod transform;
pub mod scale;
pub mod compiler;
pub mod theme_resolve;

pub use compiler::{build_descriptor, build_descriptor_checked, build_descriptor_for_tag};
pub use data::{Column, ColumnType, Dataset, Row};
pub use errors::ChartError;
pub use ir::{ChartDescriptor, ChartFamily, Customization, LegendPosition};

