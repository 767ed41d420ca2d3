use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::error::LayoutError;
use crate::ir::{Point, Side};

use super::{ConnectorStyle, LayoutKind};

/// Top-left position per node id.
pub type LayoutResult = BTreeMap<String, Point>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub side: Side,
    pub layer: usize,
}

impl NodeLayout {
    pub fn center(&self) -> Point {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Overlap depth along both axes; either value `<= 0` means the boxes are apart.
    pub fn overlap(&self, other: &NodeLayout) -> (f32, f32) {
        let overlap_x = self.right().min(other.right()) - self.x.max(other.x);
        let overlap_y = self.bottom().min(other.bottom()) - self.y.max(other.y);
        (overlap_x, overlap_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectorKind {
    Tree,
    CrossLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arrowhead {
    pub apex: Point,
    pub left: Point,
    pub right: Point,
}

impl Arrowhead {
    pub fn points(&self) -> [Point; 3] {
        [self.apex, self.left, self.right]
    }
}

/// Axis of a two-stop linear gradient, start color at `from`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientAxis {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorLabel {
    pub text: String,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorGeometry {
    pub from: String,
    pub to: String,
    pub kind: ConnectorKind,
    pub style: ConnectorStyle,
    pub start: Point,
    pub end: Point,
    /// Polyline vertices for orthogonal/direct styles; start, control point(s)
    /// and end for curve styles.
    pub points: Vec<Point>,
    pub segments: Vec<PathSegment>,
    pub arrowhead: Option<Arrowhead>,
    pub gradient: Option<GradientAxis>,
    pub dash: Option<(f32, f32)>,
    pub label: Option<ConnectorLabel>,
}

impl ConnectorGeometry {
    /// SVG path data for the connector body.
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for segment in &self.segments {
            if !d.is_empty() {
                d.push(' ');
            }
            let _ = match segment {
                PathSegment::MoveTo(p) => write!(d, "M {:.2} {:.2}", p.0, p.1),
                PathSegment::LineTo(p) => write!(d, "L {:.2} {:.2}", p.0, p.1),
                PathSegment::QuadTo { ctrl, to } => {
                    write!(d, "Q {:.2} {:.2} {:.2} {:.2}", ctrl.0, ctrl.1, to.0, to.1)
                }
                PathSegment::CubicTo { ctrl1, ctrl2, to } => write!(
                    d,
                    "C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                    ctrl1.0, ctrl1.1, ctrl2.0, ctrl2.1, to.0, to.1
                ),
            };
        }
        d
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub(super) fn from_nodes<'a>(nodes: impl Iterator<Item = &'a NodeLayout>) -> Self {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for node in nodes {
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.right());
            max_y = max_y.max(node.bottom());
        }
        if min_x == f32::MAX {
            return Self {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            };
        }
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x).max(1.0),
            height: (max_y - min_y).max(1.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: LayoutKind,
    pub connector_style: ConnectorStyle,
    pub nodes: BTreeMap<String, NodeLayout>,
    pub connectors: Vec<ConnectorGeometry>,
    pub cross_links: Vec<ConnectorGeometry>,
    pub bounds: Bounds,
    pub diagnostics: Vec<LayoutError>,
}

impl Layout {
    pub fn positions(&self) -> LayoutResult {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), (node.x, node.y)))
            .collect()
    }

    pub fn connector(&self, from: &str, to: &str) -> Option<&ConnectorGeometry> {
        self.connectors
            .iter()
            .find(|edge| edge.from == from && edge.to == to)
    }

    pub fn cross_link(&self, a: &str, b: &str) -> Option<&ConnectorGeometry> {
        self.cross_links.iter().find(|link| {
            (link.from == a && link.to == b) || (link.from == b && link.to == a)
        })
    }
}
