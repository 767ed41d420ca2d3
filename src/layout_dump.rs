use crate::layout::{ConnectorGeometry, Layout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub connector_style: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub connectors: Vec<ConnectorDump>,
    pub cross_links: Vec<ConnectorDump>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub side: String,
    pub layer: usize,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub from: String,
    pub to: String,
    pub style: String,
    pub points: Vec<[f32; 2]>,
    pub path: String,
    pub arrowhead: Option<[[f32; 2]; 3]>,
    pub dashed: bool,
    pub label: Option<String>,
}

impl ConnectorDump {
    fn from_geometry(geometry: &ConnectorGeometry) -> Self {
        Self {
            from: geometry.from.clone(),
            to: geometry.to.clone(),
            style: geometry.style.to_string(),
            points: geometry.points.iter().map(|(x, y)| [*x, *y]).collect(),
            path: geometry.path_data(),
            arrowhead: geometry
                .arrowhead
                .map(|arrow| arrow.points().map(|(x, y)| [x, y])),
            dashed: geometry.dash.is_some(),
            label: geometry.label.as_ref().map(|label| label.text.clone()),
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .values()
            .map(|node| NodeDump {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                side: format!("{:?}", node.side).to_lowercase(),
                layer: node.layer,
            })
            .collect();

        LayoutDump {
            kind: layout.kind.to_string(),
            connector_style: layout.connector_style.to_string(),
            x: layout.bounds.x,
            y: layout.bounds.y,
            width: layout.bounds.width,
            height: layout.bounds.height,
            nodes,
            connectors: layout.connectors.iter().map(ConnectorDump::from_geometry).collect(),
            cross_links: layout.cross_links.iter().map(ConnectorDump::from_geometry).collect(),
            diagnostics: layout.diagnostics.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
