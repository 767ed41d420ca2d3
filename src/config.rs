use crate::ir::Point;
use crate::layout::{ConnectorStyle, LayoutKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Horizontal indent of each deeper level under its parent.
    pub indent: f32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { indent: 24.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Per-level indent of the stacks hanging under a horizontal timeline entry.
    pub indent: f32,
    /// Left edge of every vertical timeline entry, measured from the root's center.
    pub vertical_offset: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            indent: 16.0,
            vertical_offset: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishboneConfig {
    pub angle_degrees: f32,
}

impl Default for FishboneConfig {
    fn default() -> Self {
        Self {
            angle_degrees: 45.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Length of the first orthogonal run; independent of node distance.
    pub orthogonal_run: f32,
    pub corner_radius: f32,
    pub collinear_tolerance: f32,
    pub arrow_size: f32,
    pub arrow_half_width_ratio: f32,
    /// Weight applied to the non-dominant axis when placing a quadratic control point.
    pub curve_major_weight: f32,
    /// Arc-length fraction used to derive the terminal tangent of curves.
    pub tangent_fraction: f32,
    pub arclength_samples: usize,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            orthogonal_run: 30.0,
            corner_radius: 8.0,
            collinear_tolerance: 1.0,
            arrow_size: 10.0,
            arrow_half_width_ratio: 0.4,
            curve_major_weight: 0.8,
            tangent_fraction: 0.95,
            arclength_samples: 48,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossLinkConfig {
    pub dash: (f32, f32),
    pub label_offset: f32,
    pub min_control_offset: f32,
}

impl Default for CrossLinkConfig {
    fn default() -> Self {
        Self {
            dash: (6.0, 4.0),
            label_offset: 12.0,
            min_control_offset: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoArrangeConfig {
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    pub trigger_ratio: f32,
    pub shift_ratio: f32,
    /// Upper bound on nudges applied to a single node.
    pub max_shifts_per_node: usize,
}

impl Default for AutoArrangeConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 40.0,
            vertical_spacing: 20.0,
            trigger_ratio: 0.5,
            shift_ratio: 0.7,
            max_shifts_per_node: 4096,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between a parent and its children along the primary axis.
    pub layer_spacing: f32,
    /// Gap between neighbouring sibling blocks along the cross axis.
    pub node_spacing: f32,
    pub first_layer_scale: f32,
    pub overlap_clearance: f32,
    pub default_origin: Point,
    pub catalog: CatalogConfig,
    pub timeline: TimelineConfig,
    pub fishbone: FishboneConfig,
    pub connector: ConnectorConfig,
    pub cross_link: CrossLinkConfig,
    pub auto_arrange: AutoArrangeConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_spacing: 50.0,
            node_spacing: 20.0,
            first_layer_scale: 1.2,
            overlap_clearance: 10.0,
            default_origin: (0.0, 0.0),
            catalog: CatalogConfig::default(),
            timeline: TimelineConfig::default(),
            fishbone: FishboneConfig::default(),
            connector: ConnectorConfig::default(),
            cross_link: CrossLinkConfig::default(),
            auto_arrange: AutoArrangeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub default_kind: LayoutKind,
    pub default_connector_style: ConnectorStyle,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConnectorConfigFile {
    orthogonal_run: Option<f32>,
    corner_radius: Option<f32>,
    collinear_tolerance: Option<f32>,
    arrow_size: Option<f32>,
    arrow_half_width_ratio: Option<f32>,
    curve_major_weight: Option<f32>,
    tangent_fraction: Option<f32>,
    arclength_samples: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CrossLinkConfigFile {
    dash: Option<(f32, f32)>,
    label_offset: Option<f32>,
    min_control_offset: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AutoArrangeConfigFile {
    horizontal_spacing: Option<f32>,
    vertical_spacing: Option<f32>,
    trigger_ratio: Option<f32>,
    shift_ratio: Option<f32>,
    max_shifts_per_node: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TimelineConfigFile {
    indent: Option<f32>,
    vertical_offset: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<String>,
    connector_style: Option<String>,
    layer_spacing: Option<f32>,
    node_spacing: Option<f32>,
    first_layer_scale: Option<f32>,
    overlap_clearance: Option<f32>,
    origin: Option<Point>,
    catalog_indent: Option<f32>,
    fishbone_angle: Option<f32>,
    timeline: Option<TimelineConfigFile>,
    connector: Option<ConnectorConfigFile>,
    cross_link: Option<CrossLinkConfigFile>,
    auto_arrange: Option<AutoArrangeConfigFile>,
}

/// Loads a camelCase JSON (or `.json5`) config file on top of the defaults.
/// Every key is optional; a missing path yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let parsed: ConfigFile = if is_json5 {
        json5::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    apply_config_file(&mut config, parsed);
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(name) = parsed.layout.as_deref() {
        match name.parse::<LayoutKind>() {
            Ok(kind) => config.default_kind = kind,
            Err(err) => tracing::warn!("{err}"),
        }
    }
    if let Some(name) = parsed.connector_style.as_deref() {
        match name.parse::<ConnectorStyle>() {
            Ok(style) => config.default_connector_style = style,
            Err(err) => tracing::warn!("{err}"),
        }
    }

    let layout = &mut config.layout;
    if let Some(v) = parsed.layer_spacing {
        layout.layer_spacing = v;
    }
    if let Some(v) = parsed.node_spacing {
        layout.node_spacing = v;
    }
    if let Some(v) = parsed.first_layer_scale {
        layout.first_layer_scale = v;
    }
    if let Some(v) = parsed.overlap_clearance {
        layout.overlap_clearance = v;
    }
    if let Some(v) = parsed.origin {
        layout.default_origin = v;
    }
    if let Some(v) = parsed.catalog_indent {
        layout.catalog.indent = v;
    }
    if let Some(v) = parsed.fishbone_angle {
        layout.fishbone.angle_degrees = v;
    }

    if let Some(timeline) = parsed.timeline {
        if let Some(v) = timeline.indent {
            layout.timeline.indent = v;
        }
        if let Some(v) = timeline.vertical_offset {
            layout.timeline.vertical_offset = v;
        }
    }

    if let Some(connector) = parsed.connector {
        if let Some(v) = connector.orthogonal_run {
            layout.connector.orthogonal_run = v;
        }
        if let Some(v) = connector.corner_radius {
            layout.connector.corner_radius = v;
        }
        if let Some(v) = connector.collinear_tolerance {
            layout.connector.collinear_tolerance = v;
        }
        if let Some(v) = connector.arrow_size {
            layout.connector.arrow_size = v;
        }
        if let Some(v) = connector.arrow_half_width_ratio {
            layout.connector.arrow_half_width_ratio = v;
        }
        if let Some(v) = connector.curve_major_weight {
            layout.connector.curve_major_weight = v;
        }
        if let Some(v) = connector.tangent_fraction {
            layout.connector.tangent_fraction = v;
        }
        if let Some(v) = connector.arclength_samples {
            layout.connector.arclength_samples = v;
        }
    }

    if let Some(cross_link) = parsed.cross_link {
        if let Some(v) = cross_link.dash {
            layout.cross_link.dash = v;
        }
        if let Some(v) = cross_link.label_offset {
            layout.cross_link.label_offset = v;
        }
        if let Some(v) = cross_link.min_control_offset {
            layout.cross_link.min_control_offset = v;
        }
    }

    if let Some(auto) = parsed.auto_arrange {
        if let Some(v) = auto.horizontal_spacing {
            layout.auto_arrange.horizontal_spacing = v;
        }
        if let Some(v) = auto.vertical_spacing {
            layout.auto_arrange.vertical_spacing = v;
        }
        if let Some(v) = auto.trigger_ratio {
            layout.auto_arrange.trigger_ratio = v;
        }
        if let Some(v) = auto.shift_ratio {
            layout.auto_arrange.shift_ratio = v;
        }
        if let Some(v) = auto.max_shifts_per_node {
            layout.auto_arrange.max_shifts_per_node = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.default_kind, LayoutKind::MindMap);
        assert_eq!(config.default_connector_style, ConnectorStyle::Orthogonal);
        assert_eq!(config.layout.layer_spacing, 50.0);
    }

    #[test]
    fn json_file_overlays_defaults() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"layout":"organization","connectorStyle":"cubic","nodeSpacing":32,"connector":{{"orthogonalRun":44}},"fishboneAngle":60}}"#
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.default_kind, LayoutKind::Organization);
        assert_eq!(config.default_connector_style, ConnectorStyle::Cubic);
        assert_eq!(config.layout.node_spacing, 32.0);
        assert_eq!(config.layout.connector.orthogonal_run, 44.0);
        assert_eq!(config.layout.fishbone.angle_degrees, 60.0);
        assert_eq!(config.layout.layer_spacing, 50.0);
    }

    #[test]
    fn json5_file_and_unknown_names_fall_back() {
        let mut file = tempfile::Builder::new().suffix(".json5").tempfile().unwrap();
        write!(
            file,
            "{{ layout: 'radial', // not a known layout\n crossLink: {{ labelOffset: 20 }} }}"
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.default_kind, LayoutKind::MindMap);
        assert_eq!(config.layout.cross_link.label_offset, 20.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }
}
