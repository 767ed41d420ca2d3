use serde::{Deserialize, Serialize};

/// A 2-D point. Layout positions are top-left corners; anchors and path points
/// are absolute scene coordinates.
pub type Point = (f32, f32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
    #[default]
    None,
}

impl Side {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    #[serde(default)]
    pub preferred_side: Option<Side>,
}

fn default_expanded() -> bool {
    true
}

impl NodeDescriptor {
    pub fn new(id: impl Into<String>, parent_id: Option<&str>, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            width,
            height,
            expanded: true,
            preferred_side: None,
        }
    }

    pub fn collapsed(mut self) -> Self {
        self.expanded = false;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.preferred_side = Some(side);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossLinkDescriptor {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub control_points: Vec<Point>,
    #[serde(default)]
    pub label: Option<String>,
}

impl CrossLinkDescriptor {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            control_points: Vec::new(),
            label: None,
        }
    }
}

/// Flat snapshot handed over by the caller right before a layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub cross_links: Vec<CrossLinkDescriptor>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_node(&mut self, node: NodeDescriptor) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn push_root(&mut self, id: &str, width: f32, height: f32) -> &mut Self {
        self.push_node(NodeDescriptor::new(id, None, width, height))
    }

    pub fn push_child(&mut self, parent: &str, id: &str, width: f32, height: f32) -> &mut Self {
        self.push_node(NodeDescriptor::new(id, Some(parent), width, height))
    }

    pub fn push_cross_link(&mut self, from: &str, to: &str, label: Option<&str>) -> &mut Self {
        let mut link = CrossLinkDescriptor::new(from, to);
        link.label = label.map(str::to_string);
        self.cross_links.push(link);
        self
    }
}
