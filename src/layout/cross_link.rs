use std::collections::{BTreeMap, HashSet};

use crate::config::{ConnectorConfig, CrossLinkConfig};
use crate::error::{LayoutError, report};
use crate::ir::{CrossLinkDescriptor, Point};

use super::geometry::{cubic_derivative, cubic_point, direction};
use super::routing::{anchor_point, anchors_coincide, arrowhead, curve_tangent, edge_sides};
use super::tree::LayoutTree;
use super::{ConnectorGeometry, ConnectorKind, ConnectorLabel, ConnectorStyle, NodeLayout, PathSegment};

/// Label position along the curve parameter.
const LABEL_T: f32 = 0.5;

/// Routes every valid cross-link as a dashed cubic. Self-links, repeated
/// unordered pairs and links to unknown ids are reported and dropped; links
/// whose endpoint is hidden under a collapsed node are skipped without a
/// diagnostic.
pub(super) fn route_cross_links(
    links: &[CrossLinkDescriptor],
    tree: &LayoutTree,
    nodes: &BTreeMap<String, NodeLayout>,
    connector: &ConnectorConfig,
    config: &CrossLinkConfig,
    diagnostics: &mut Vec<LayoutError>,
) -> Vec<ConnectorGeometry> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut routed = Vec::new();
    for link in links {
        if link.from == link.to {
            report(diagnostics, LayoutError::SelfCrossLink { id: link.from.clone() });
            continue;
        }
        if tree.index_of(&link.from).is_none() || tree.index_of(&link.to).is_none() {
            report(
                diagnostics,
                LayoutError::UnknownCrossLinkEndpoint {
                    from: link.from.clone(),
                    to: link.to.clone(),
                },
            );
            continue;
        }
        let key = if link.from <= link.to {
            (link.from.as_str(), link.to.as_str())
        } else {
            (link.to.as_str(), link.from.as_str())
        };
        if !seen.insert(key) {
            report(
                diagnostics,
                LayoutError::DuplicateCrossLink {
                    from: link.from.clone(),
                    to: link.to.clone(),
                },
            );
            continue;
        }
        let (Some(from), Some(to)) = (nodes.get(&link.from), nodes.get(&link.to)) else {
            continue;
        };
        routed.push(route_cross_link(link, from, to, connector, config, diagnostics));
    }
    routed
}

fn route_cross_link(
    link: &CrossLinkDescriptor,
    from: &NodeLayout,
    to: &NodeLayout,
    connector: &ConnectorConfig,
    config: &CrossLinkConfig,
    diagnostics: &mut Vec<LayoutError>,
) -> ConnectorGeometry {
    let (start_side, end_side) = edge_sides(from, to, None);
    let start = anchor_point(from, start_side);
    let end = anchor_point(to, end_side);

    let (ctrl1, ctrl2) = match link.control_points.as_slice() {
        [] => {
            let (sx, sy) = start_side.normal();
            let (ex, ey) = end_side.normal();
            // Normals of the anchoring edges lie on the dominant axis.
            let span = (end.0 - start.0).abs() * sx.abs() + (end.1 - start.1).abs() * sy.abs();
            let offset = (span / 2.0).max(config.min_control_offset.max(0.0));
            (
                (start.0 + sx * offset, start.1 + sy * offset),
                (end.0 + ex * offset, end.1 + ey * offset),
            )
        }
        [only] => (*only, *only),
        [first, second, ..] => (*first, *second),
    };

    let arrowhead = if anchors_coincide(start, end) {
        report(
            diagnostics,
            LayoutError::CoincidentAnchors {
                from: from.id.clone(),
                to: to.id.clone(),
            },
        );
        None
    } else {
        curve_tangent(|t| cubic_point(start, ctrl1, ctrl2, end, t), end, connector)
            .and_then(|tangent| arrowhead(end, tangent, connector))
    };

    let label = link
        .label
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(|text| ConnectorLabel {
            text: text.to_string(),
            position: label_position(start, ctrl1, ctrl2, end, config.label_offset),
        });

    ConnectorGeometry {
        from: from.id.clone(),
        to: to.id.clone(),
        kind: ConnectorKind::CrossLink,
        style: ConnectorStyle::Cubic,
        start,
        end,
        points: vec![start, ctrl1, ctrl2, end],
        segments: vec![
            PathSegment::MoveTo(start),
            PathSegment::CubicTo {
                ctrl1,
                ctrl2,
                to: end,
            },
        ],
        arrowhead,
        gradient: None,
        dash: Some(config.dash),
        label,
    }
}

/// Curve midpoint pushed along the upward-pointing normal.
fn label_position(start: Point, ctrl1: Point, ctrl2: Point, end: Point, offset: f32) -> Point {
    let mid = cubic_point(start, ctrl1, ctrl2, end, LABEL_T);
    let d = cubic_derivative(start, ctrl1, ctrl2, end, LABEL_T);
    let normal = match direction((0.0, 0.0), d) {
        Some((tx, ty)) => {
            let n = (-ty, tx);
            if n.1 > 0.0 { (-n.0, -n.1) } else { n }
        }
        None => (0.0, -1.0),
    };
    (mid.0 + normal.0 * offset, mid.1 + normal.1 * offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{NodeDescriptor, Side};

    fn fixture() -> (LayoutTree, BTreeMap<String, NodeLayout>) {
        let descriptors = vec![
            NodeDescriptor::new("root", None, 100.0, 40.0),
            NodeDescriptor::new("a", Some("root"), 100.0, 40.0),
            NodeDescriptor::new("b", Some("root"), 100.0, 40.0).collapsed(),
            NodeDescriptor::new("b1", Some("b"), 100.0, 40.0),
        ];
        let tree = LayoutTree::build(&descriptors).0;
        let mut nodes = BTreeMap::new();
        for (id, x, y) in [("root", 0.0, 0.0), ("a", 300.0, 0.0), ("b", 0.0, 200.0)] {
            nodes.insert(
                id.to_string(),
                NodeLayout {
                    id: id.to_string(),
                    x,
                    y,
                    width: 100.0,
                    height: 40.0,
                    side: Side::None,
                    layer: 0,
                },
            );
        }
        (tree, nodes)
    }

    fn route(links: &[CrossLinkDescriptor]) -> (Vec<ConnectorGeometry>, Vec<LayoutError>) {
        let (tree, nodes) = fixture();
        let mut diagnostics = Vec::new();
        let routed = route_cross_links(
            links,
            &tree,
            &nodes,
            &ConnectorConfig::default(),
            &CrossLinkConfig::default(),
            &mut diagnostics,
        );
        (routed, diagnostics)
    }

    #[test]
    fn default_controls_push_out_of_anchor_edges() {
        let (routed, diagnostics) = route(&[CrossLinkDescriptor::new("root", "a")]);
        assert!(diagnostics.is_empty());
        let link = &routed[0];
        assert_eq!(link.start, (100.0, 20.0));
        assert_eq!(link.end, (300.0, 20.0));
        // Half of the 200-unit span.
        assert_eq!(link.points[1], (200.0, 20.0));
        assert_eq!(link.points[2], (200.0, 20.0));
        assert_eq!(link.dash, Some((6.0, 4.0)));
        assert_eq!(link.kind, ConnectorKind::CrossLink);
        assert!(link.arrowhead.is_some());
    }

    #[test]
    fn vertical_links_anchor_top_and_bottom() {
        let (routed, _) = route(&[CrossLinkDescriptor::new("root", "b")]);
        let link = &routed[0];
        assert_eq!(link.start, (50.0, 40.0));
        assert_eq!(link.points[1], (50.0, 120.0));
        assert_eq!(link.points[2], (50.0, 120.0));
    }

    #[test]
    fn custom_control_points_replace_heuristic() {
        let mut single = CrossLinkDescriptor::new("root", "a");
        single.control_points = vec![(150.0, -80.0)];
        let mut pair = CrossLinkDescriptor::new("a", "b");
        pair.control_points = vec![(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)];
        let (routed, _) = route(&[single, pair]);
        assert_eq!(routed[0].points[1], (150.0, -80.0));
        assert_eq!(routed[0].points[2], (150.0, -80.0));
        assert_eq!(routed[1].points[1..3], [(10.0, 10.0), (20.0, 20.0)]);
    }

    #[test]
    fn label_sits_above_the_midpoint() {
        let mut link = CrossLinkDescriptor::new("root", "a");
        link.label = Some("relates".into());
        let (routed, _) = route(&[link]);
        let label = routed[0].label.as_ref().unwrap();
        assert_eq!(label.text, "relates");
        assert!((label.position.0 - 200.0).abs() < 1e-3);
        assert!((label.position.1 - 8.0).abs() < 1e-3);
    }

    #[test]
    fn invalid_links_are_reported_and_hidden_ones_skipped() {
        let (routed, diagnostics) = route(&[
            CrossLinkDescriptor::new("a", "a"),
            CrossLinkDescriptor::new("a", "ghost"),
            CrossLinkDescriptor::new("root", "a"),
            CrossLinkDescriptor::new("a", "root"),
            CrossLinkDescriptor::new("a", "b1"),
        ]);
        assert_eq!(routed.len(), 1);
        assert_eq!(
            diagnostics,
            vec![
                LayoutError::SelfCrossLink { id: "a".into() },
                LayoutError::UnknownCrossLinkEndpoint {
                    from: "a".into(),
                    to: "ghost".into()
                },
                LayoutError::DuplicateCrossLink {
                    from: "a".into(),
                    to: "root".into()
                },
            ]
        );
    }
}
