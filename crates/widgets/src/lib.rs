pub mod error;
pub mod graph;
pub mod info;

pub use error::ErrorWidget;
pub use graph::GraphWidget;
pub use info::InfoWidget;
