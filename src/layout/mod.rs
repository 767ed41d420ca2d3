mod catalog;
mod cross_link;
mod fishbone;
mod geometry;
mod mindmap;
mod organization;
mod overlap;
mod routing;
mod strategy;
mod timeline;
mod tree;
pub(crate) mod types;

pub use routing::AnchorAxis;
pub use types::*;
use catalog::*;
use fishbone::*;
use mindmap::*;
use organization::*;
use overlap::*;
use strategy::*;
use timeline::*;
use tree::{LayoutTree, NodeIndex};

use crate::config::{Config, LayoutConfig};
use crate::error::{LayoutError, report};
use crate::ir::{Diagram, Point, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    #[default]
    MindMap,
    LogicalRight,
    LogicalLeft,
    Organization,
    Catalog,
    TimelineHorizontal,
    TimelineVertical,
    Fishbone,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 8] = [
        LayoutKind::MindMap,
        LayoutKind::LogicalRight,
        LayoutKind::LogicalLeft,
        LayoutKind::Organization,
        LayoutKind::Catalog,
        LayoutKind::TimelineHorizontal,
        LayoutKind::TimelineVertical,
        LayoutKind::Fishbone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::MindMap => "mind-map",
            LayoutKind::LogicalRight => "logical-right",
            LayoutKind::LogicalLeft => "logical-left",
            LayoutKind::Organization => "organization",
            LayoutKind::Catalog => "catalog",
            LayoutKind::TimelineHorizontal => "timeline-horizontal",
            LayoutKind::TimelineVertical => "timeline-vertical",
            LayoutKind::Fishbone => "fishbone",
        }
    }

    /// Anchor axis this kind imposes on tree connectors, if any.
    pub fn forced_anchor_axis(self) -> Option<AnchorAxis> {
        match self {
            LayoutKind::Organization | LayoutKind::Catalog | LayoutKind::TimelineVertical => {
                Some(AnchorAxis::Vertical)
            }
            LayoutKind::TimelineHorizontal => Some(AnchorAxis::Horizontal),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "mind-map" | "mindmap" => Ok(LayoutKind::MindMap),
            "logical" | "logical-right" => Ok(LayoutKind::LogicalRight),
            "logical-left" => Ok(LayoutKind::LogicalLeft),
            "organization" | "org" => Ok(LayoutKind::Organization),
            "catalog" => Ok(LayoutKind::Catalog),
            "timeline" | "timeline-horizontal" => Ok(LayoutKind::TimelineHorizontal),
            "timeline-vertical" => Ok(LayoutKind::TimelineVertical),
            "fishbone" => Ok(LayoutKind::Fishbone),
            _ => Err(LayoutError::UnknownLayoutKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorStyle {
    /// Folded polyline with a fixed first run and rounded corners.
    #[default]
    Orthogonal,
    Quadratic,
    Direct,
    /// S-curve stroked with a two-stop gradient.
    Cubic,
}

impl ConnectorStyle {
    pub const ALL: [ConnectorStyle; 4] = [
        ConnectorStyle::Orthogonal,
        ConnectorStyle::Quadratic,
        ConnectorStyle::Direct,
        ConnectorStyle::Cubic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConnectorStyle::Orthogonal => "orthogonal",
            ConnectorStyle::Quadratic => "quadratic",
            ConnectorStyle::Direct => "direct",
            ConnectorStyle::Cubic => "cubic",
        }
    }
}

impl fmt::Display for ConnectorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConnectorStyle {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orthogonal" | "folded" | "polyline" => Ok(ConnectorStyle::Orthogonal),
            "quadratic" | "curve" => Ok(ConnectorStyle::Quadratic),
            "direct" | "line" | "straight" => Ok(ConnectorStyle::Direct),
            "cubic" | "bezier" => Ok(ConnectorStyle::Cubic),
            _ => Err(LayoutError::UnknownConnectorStyle(s.to_string())),
        }
    }
}

/// What to lay out and how to draw the tree connectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutRequest {
    pub kind: LayoutKind,
    pub connector_style: ConnectorStyle,
    /// Where the root's center lands; `None` uses `LayoutConfig::default_origin`.
    pub origin: Option<Point>,
    diagnostics: Vec<LayoutError>,
}

impl LayoutRequest {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            kind: config.default_kind,
            connector_style: config.default_connector_style,
            ..Self::default()
        }
    }

    /// Resolves names leniently: an unknown name falls back to the default and
    /// is kept as a diagnostic that ends up in the computed [`Layout`].
    pub fn from_names(kind: &str, connector_style: &str, origin: Option<Point>) -> Self {
        let mut diagnostics = Vec::new();
        let kind = kind.parse().unwrap_or_else(|err| {
            report(&mut diagnostics, err);
            LayoutKind::default()
        });
        let connector_style = connector_style.parse().unwrap_or_else(|err| {
            report(&mut diagnostics, err);
            ConnectorStyle::default()
        });
        Self {
            kind,
            connector_style,
            origin,
            diagnostics,
        }
    }

    pub fn with_connector_style(mut self, connector_style: ConnectorStyle) -> Self {
        self.connector_style = connector_style;
        self
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn diagnostics(&self) -> &[LayoutError] {
        &self.diagnostics
    }
}

fn anchor_rule(kind: LayoutKind, config: &LayoutConfig) -> routing::AnchorRule {
    let column_indent = match kind {
        LayoutKind::Catalog => Some(config.catalog.indent),
        LayoutKind::TimelineHorizontal => Some(config.timeline.indent),
        _ => None,
    };
    routing::AnchorRule {
        forced: kind.forced_anchor_axis(),
        column_indent: column_indent.map(|indent| indent.max(0.0)),
    }
}

/// Builds the tree from `diagram`, runs the requested strategy and routes every
/// connector. Never fails: malformed input is dropped and reported in
/// [`Layout::diagnostics`].
pub fn compute_layout(diagram: &Diagram, request: &LayoutRequest, config: &LayoutConfig) -> Layout {
    let (tree, diagnostics) = LayoutTree::build(&diagram.nodes);
    let ctx = LayoutContext::new(config, request.origin);
    let state = run_strategy(strategy_for(request.kind), &tree, &ctx);
    build_layout(diagram, request, config, &tree, &state, diagnostics)
}

/// Mind-map layout followed by a pairwise nudge that pushes any node too close
/// to an earlier one down and to the right. The requested kind is ignored.
pub fn auto_arrange(diagram: &Diagram, request: &LayoutRequest, config: &LayoutConfig) -> Layout {
    let (tree, diagnostics) = LayoutTree::build(&diagram.nodes);
    let ctx = LayoutContext::new(config, request.origin);
    let mut state = run_strategy(strategy_for(LayoutKind::MindMap), &tree, &ctx);
    auto_arrange_placement(&tree, &mut state, &ctx);
    let request = LayoutRequest {
        kind: LayoutKind::MindMap,
        ..request.clone()
    };
    build_layout(diagram, &request, config, &tree, &state, diagnostics)
}

fn build_layout(
    diagram: &Diagram,
    request: &LayoutRequest,
    config: &LayoutConfig,
    tree: &LayoutTree,
    state: &Placement,
    tree_diagnostics: Vec<LayoutError>,
) -> Layout {
    let mut diagnostics = request.diagnostics.clone();
    diagnostics.extend(tree_diagnostics);

    let mut nodes = BTreeMap::new();
    for idx in tree.visible_preorder() {
        let node = tree.node(idx);
        nodes.insert(
            node.id.clone(),
            NodeLayout {
                id: node.id.clone(),
                x: state.x[idx],
                y: state.y[idx],
                width: node.width,
                height: node.height,
                side: state.side[idx],
                layer: node.layer_index,
            },
        );
    }

    let connectors = routing::route_tree_edges(
        tree,
        &nodes,
        request.connector_style,
        anchor_rule(request.kind, config),
        &config.connector,
        &mut diagnostics,
    );
    let cross_links = cross_link::route_cross_links(
        &diagram.cross_links,
        tree,
        &nodes,
        &config.connector,
        &config.cross_link,
        &mut diagnostics,
    );
    let bounds = Bounds::from_nodes(nodes.values());

    tracing::debug!(
        kind = %request.kind,
        style = %request.connector_style,
        nodes = nodes.len(),
        connectors = connectors.len(),
        cross_links = cross_links.len(),
        diagnostics = diagnostics.len(),
        "layout pass complete"
    );

    Layout {
        kind: request.kind,
        connector_style: request.connector_style,
        nodes,
        connectors,
        cross_links,
        bounds,
        diagnostics,
    }
}
