pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;

pub use config::{Config, LayoutConfig, load_config};
pub use error::{ErrorCategory, LayoutError};
pub use ir::{CrossLinkDescriptor, Diagram, NodeDescriptor, Point, Side};
pub use layout::{
    ConnectorGeometry, ConnectorStyle, Layout, LayoutKind, LayoutRequest, LayoutResult,
    auto_arrange, compute_layout,
};
