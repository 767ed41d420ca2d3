use std::collections::BTreeMap;

use crate::config::ConnectorConfig;
use crate::error::{LayoutError, report};
use crate::ir::Point;

use super::geometry::{cubic_point, direction, distance, lerp, point_at_length_fraction, quad_point};
use super::tree::LayoutTree;
use super::{
    Arrowhead, ConnectorGeometry, ConnectorKind, ConnectorStyle, GradientAxis, NodeLayout,
    PathSegment,
};

// ── Corner rounding ─────────────────────────────────────────────────
/// Rounding radius is at most this share of either adjacent segment.
const CORNER_SEGMENT_SHARE: f32 = 0.5;
/// Radii below this are drawn as sharp corners.
const MIN_CORNER_RADIUS: f32 = 0.5;

// ── Curves ──────────────────────────────────────────────────────────
/// Cubic controls sit this fraction of the way toward the far endpoint.
const CUBIC_PULL: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum EdgeSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl EdgeSide {
    /// Outward unit normal of this edge of a box.
    pub(super) fn normal(self) -> Point {
        match self {
            EdgeSide::Left => (-1.0, 0.0),
            EdgeSide::Right => (1.0, 0.0),
            EdgeSide::Top => (0.0, -1.0),
            EdgeSide::Bottom => (0.0, 1.0),
        }
    }

    fn is_vertical_edge(self) -> bool {
        matches!(self, EdgeSide::Left | EdgeSide::Right)
    }
}

/// Which pair of edges a connector attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorAxis {
    /// Left/right edges.
    Horizontal,
    /// Top/bottom edges.
    Vertical,
}

/// Terminal direction of an orthogonal run, taken from the edge it enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ArrowDirection {
    Left,
    Right,
    Up,
    Down,
}

impl ArrowDirection {
    fn entering(side: EdgeSide) -> Self {
        match side {
            EdgeSide::Left => ArrowDirection::Right,
            EdgeSide::Right => ArrowDirection::Left,
            EdgeSide::Top => ArrowDirection::Down,
            EdgeSide::Bottom => ArrowDirection::Up,
        }
    }

    fn vector(self) -> Point {
        match self {
            ArrowDirection::Left => (-1.0, 0.0),
            ArrowDirection::Right => (1.0, 0.0),
            ArrowDirection::Up => (0.0, -1.0),
            ArrowDirection::Down => (0.0, 1.0),
        }
    }
}

/// Picks the anchoring edges by the dominant center delta; ties anchor
/// horizontally. `forced` overrides the comparison.
pub(super) fn edge_sides(
    from: &NodeLayout,
    to: &NodeLayout,
    forced: Option<AnchorAxis>,
) -> (EdgeSide, EdgeSide) {
    let (from_cx, from_cy) = from.center();
    let (to_cx, to_cy) = to.center();
    let dx = to_cx - from_cx;
    let dy = to_cy - from_cy;
    let axis = forced.unwrap_or(if dx.abs() >= dy.abs() {
        AnchorAxis::Horizontal
    } else {
        AnchorAxis::Vertical
    });
    match axis {
        AnchorAxis::Horizontal if dx >= 0.0 => (EdgeSide::Right, EdgeSide::Left),
        AnchorAxis::Horizontal => (EdgeSide::Left, EdgeSide::Right),
        AnchorAxis::Vertical if dy >= 0.0 => (EdgeSide::Bottom, EdgeSide::Top),
        AnchorAxis::Vertical => (EdgeSide::Top, EdgeSide::Bottom),
    }
}

/// Midpoint of the given edge of `node`.
pub(super) fn anchor_point(node: &NodeLayout, side: EdgeSide) -> Point {
    let (cx, cy) = node.center();
    match side {
        EdgeSide::Left => (node.x, cy),
        EdgeSide::Right => (node.right(), cy),
        EdgeSide::Top => (cx, node.y),
        EdgeSide::Bottom => (cx, node.bottom()),
    }
}

/// How a layout wants its tree connectors anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct AnchorRule {
    pub(super) forced: Option<AnchorAxis>,
    /// Set for column layouts: edges below the first layer become elbows
    /// whose trunk stays inside this indent.
    pub(super) column_indent: Option<f32>,
}

pub(super) fn route_tree_edges(
    tree: &LayoutTree,
    nodes: &BTreeMap<String, NodeLayout>,
    style: ConnectorStyle,
    rule: AnchorRule,
    config: &ConnectorConfig,
    diagnostics: &mut Vec<LayoutError>,
) -> Vec<ConnectorGeometry> {
    let root = tree.root();
    let mut connectors = Vec::new();
    for idx in tree.visible_preorder() {
        let child = tree.node(idx);
        let Some(parent) = child.parent else {
            continue;
        };
        let (Some(from), Some(to)) = (nodes.get(&tree.node(parent).id), nodes.get(&child.id)) else {
            continue;
        };
        let connector = match rule.column_indent {
            Some(indent) if Some(parent) != root => {
                route_column_connector(from, to, style, indent, config, diagnostics)
            }
            _ => route_connector(from, to, style, rule.forced, config, diagnostics),
        };
        connectors.push(connector);
    }
    connectors
}

#[derive(Debug, Clone, Copy)]
struct Anchors {
    start: Point,
    end: Point,
    start_side: EdgeSide,
    end_side: EdgeSide,
}

impl Anchors {
    /// Corner of the single elbow joining perpendicular edges, if they are.
    fn elbow(&self) -> Option<Point> {
        if self.start_side.is_vertical_edge() == self.end_side.is_vertical_edge() {
            None
        } else if self.start_side.is_vertical_edge() {
            Some((self.end.0, self.start.1))
        } else {
            Some((self.start.0, self.end.1))
        }
    }
}

/// Anchors, path and arrowhead of one parent→child connector.
pub(super) fn route_connector(
    from: &NodeLayout,
    to: &NodeLayout,
    style: ConnectorStyle,
    forced: Option<AnchorAxis>,
    config: &ConnectorConfig,
    diagnostics: &mut Vec<LayoutError>,
) -> ConnectorGeometry {
    let (start_side, end_side) = edge_sides(from, to, forced);
    let anchors = Anchors {
        start: anchor_point(from, start_side),
        end: anchor_point(to, end_side),
        start_side,
        end_side,
    };
    connect(from, to, anchors, style, config, diagnostics)
}

/// Column connector: leaves the parent's bottom edge on a trunk inside the
/// indent and enters the child's left edge, so it passes left of every box
/// stacked between the two.
pub(super) fn route_column_connector(
    from: &NodeLayout,
    to: &NodeLayout,
    style: ConnectorStyle,
    indent: f32,
    config: &ConnectorConfig,
    diagnostics: &mut Vec<LayoutError>,
) -> ConnectorGeometry {
    let trunk = (indent.max(0.0) / 2.0).min(from.width / 2.0);
    let anchors = Anchors {
        start: (from.x + trunk, from.bottom()),
        end: anchor_point(to, EdgeSide::Left),
        start_side: EdgeSide::Bottom,
        end_side: EdgeSide::Left,
    };
    connect(from, to, anchors, style, config, diagnostics)
}

fn connect(
    from: &NodeLayout,
    to: &NodeLayout,
    anchors: Anchors,
    style: ConnectorStyle,
    config: &ConnectorConfig,
    diagnostics: &mut Vec<LayoutError>,
) -> ConnectorGeometry {
    let Anchors { start, end, start_side, end_side } = anchors;
    let horizontal = start_side.is_vertical_edge();
    let elbow = anchors.elbow();

    let (points, segments, tangent, gradient) = match style {
        ConnectorStyle::Orthogonal => {
            let points = match elbow {
                Some(corner) => vec![start, corner, end],
                None => orthogonal_points(start, end, start_side, config.orthogonal_run),
            };
            let segments = rounded_polyline(&points, config.corner_radius, config.collinear_tolerance);
            let tangent = Some(ArrowDirection::entering(end_side).vector());
            (points, segments, tangent, None)
        }
        ConnectorStyle::Quadratic => {
            let ctrl = elbow
                .unwrap_or_else(|| quadratic_control(start, end, horizontal, config.curve_major_weight));
            let tangent = curve_tangent(|t| quad_point(start, ctrl, end, t), end, config);
            (
                vec![start, ctrl, end],
                vec![PathSegment::MoveTo(start), PathSegment::QuadTo { ctrl, to: end }],
                tangent,
                None,
            )
        }
        ConnectorStyle::Direct => (
            vec![start, end],
            vec![PathSegment::MoveTo(start), PathSegment::LineTo(end)],
            direction(start, end),
            None,
        ),
        ConnectorStyle::Cubic => {
            let (ctrl1, ctrl2) = match elbow {
                Some(corner) => (lerp(start, corner, CUBIC_PULL), lerp(end, corner, CUBIC_PULL)),
                None => s_curve_controls(start, end, horizontal),
            };
            let tangent = curve_tangent(|t| cubic_point(start, ctrl1, ctrl2, end, t), end, config);
            (
                vec![start, ctrl1, ctrl2, end],
                vec![
                    PathSegment::MoveTo(start),
                    PathSegment::CubicTo {
                        ctrl1,
                        ctrl2,
                        to: end,
                    },
                ],
                tangent,
                Some(GradientAxis {
                    from: start,
                    to: end,
                }),
            )
        }
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
        tangent.and_then(|tangent| arrowhead(end, tangent, config))
    };

    ConnectorGeometry {
        from: from.id.clone(),
        to: to.id.clone(),
        kind: ConnectorKind::Tree,
        style,
        start,
        end,
        points,
        segments,
        arrowhead,
        gradient,
        dash: None,
        label: None,
    }
}

pub(super) fn anchors_coincide(start: Point, end: Point) -> bool {
    direction(start, end).is_none()
}

/// Start, one fixed run out of the start edge, the turn onto the end's cross
/// line, end. The run length never depends on how far apart the boxes are.
fn orthogonal_points(start: Point, end: Point, start_side: EdgeSide, run: f32) -> Vec<Point> {
    let run = run.max(0.0);
    let (nx, ny) = start_side.normal();
    let first = (start.0 + nx * run, start.1 + ny * run);
    let turn = if start_side.is_vertical_edge() {
        (first.0, end.1)
    } else {
        (end.0, first.1)
    };
    vec![start, first, turn, end]
}

/// Polyline segments with every non-collinear interior corner replaced by a
/// quadratic curve controlled by the corner itself.
fn rounded_polyline(points: &[Point], radius: f32, tolerance: f32) -> Vec<PathSegment> {
    let mut segments = Vec::with_capacity(points.len() * 2);
    let Some(&first) = points.first() else {
        return segments;
    };
    segments.push(PathSegment::MoveTo(first));
    for i in 1..points.len() {
        let corner = points[i];
        if i + 1 == points.len() {
            segments.push(PathSegment::LineTo(corner));
            break;
        }
        let prev = points[i - 1];
        let next = points[i + 1];
        let collinear = ((prev.0 - corner.0).abs() <= tolerance && (corner.0 - next.0).abs() <= tolerance)
            || ((prev.1 - corner.1).abs() <= tolerance && (corner.1 - next.1).abs() <= tolerance);
        let r = radius
            .min(distance(prev, corner) * CORNER_SEGMENT_SHARE)
            .min(distance(corner, next) * CORNER_SEGMENT_SHARE);
        let (Some(back), Some(ahead)) = (direction(corner, prev), direction(corner, next)) else {
            segments.push(PathSegment::LineTo(corner));
            continue;
        };
        if collinear || r.is_nan() || r < MIN_CORNER_RADIUS {
            segments.push(PathSegment::LineTo(corner));
            continue;
        }
        let entry = (corner.0 + back.0 * r, corner.1 + back.1 * r);
        let exit = (corner.0 + ahead.0 * r, corner.1 + ahead.1 * r);
        segments.push(PathSegment::LineTo(entry));
        segments.push(PathSegment::QuadTo {
            ctrl: corner,
            to: exit,
        });
    }
    segments
}

/// Control point biased toward the non-dominant axis so the curve bows away
/// from the straight line.
fn quadratic_control(start: Point, end: Point, horizontal: bool, weight: f32) -> Point {
    let major = weight.clamp(0.0, 1.0);
    let minor = 1.0 - major;
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    if horizontal {
        (start.0 + dx * minor, start.1 + dy * major)
    } else {
        (start.0 + dx * major, start.1 + dy * minor)
    }
}

/// Classic S-curve: each control is pulled halfway toward the other endpoint
/// along the dominant axis only.
fn s_curve_controls(start: Point, end: Point, horizontal: bool) -> (Point, Point) {
    if horizontal {
        let pull = (end.0 - start.0) * CUBIC_PULL;
        ((start.0 + pull, start.1), (end.0 - pull, end.1))
    } else {
        let pull = (end.1 - start.1) * CUBIC_PULL;
        ((start.0, start.1 + pull), (end.0, end.1 - pull))
    }
}

/// Unit direction from the configured arc-length fraction to the endpoint.
pub(super) fn curve_tangent(
    curve: impl Fn(f32) -> Point,
    end: Point,
    config: &ConnectorConfig,
) -> Option<Point> {
    let near_end = point_at_length_fraction(curve, config.arclength_samples, config.tangent_fraction);
    direction(near_end, end)
}

/// Triangle with its apex on `end`, base `arrow_size` back along `tangent`.
pub(super) fn arrowhead(end: Point, tangent: Point, config: &ConnectorConfig) -> Option<Arrowhead> {
    let size = config.arrow_size;
    if size.is_nan() || size <= 0.0 {
        return None;
    }
    let half = size * config.arrow_half_width_ratio;
    let base = (end.0 - tangent.0 * size, end.1 - tangent.1 * size);
    let perp = (-tangent.1, tangent.0);
    Some(Arrowhead {
        apex: end,
        left: (base.0 + perp.0 * half, base.1 + perp.1 * half),
        right: (base.0 - perp.0 * half, base.1 - perp.1 * half),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Side;

    fn node(id: &str, x: f32, y: f32, width: f32, height: f32) -> NodeLayout {
        NodeLayout {
            id: id.to_string(),
            x,
            y,
            width,
            height,
            side: Side::None,
            layer: 0,
        }
    }

    fn route(from: &NodeLayout, to: &NodeLayout, style: ConnectorStyle) -> (ConnectorGeometry, Vec<LayoutError>) {
        let mut diagnostics = Vec::new();
        let geometry = route_connector(from, to, style, None, &ConnectorConfig::default(), &mut diagnostics);
        (geometry, diagnostics)
    }

    #[test]
    fn orthogonal_anchor_example() {
        let parent = node("p", 0.0, 0.0, 280.0, 180.0);
        let child = node("c", 560.0, 90.0, 280.0, 180.0);
        let (edge, diagnostics) = route(&parent, &child, ConnectorStyle::Orthogonal);
        assert!(diagnostics.is_empty());
        assert_eq!(edge.start, (280.0, 90.0));
        assert_eq!(edge.end, (560.0, 180.0));
        assert_eq!(edge.points.len(), 4);
        assert_eq!(edge.points[1], (310.0, 90.0));
        assert_eq!(edge.points[2], (310.0, 180.0));
        assert_eq!(
            edge.path_data(),
            "M 280.00 90.00 L 302.00 90.00 Q 310.00 90.00 310.00 98.00 \
             L 310.00 172.00 Q 310.00 180.00 318.00 180.00 L 560.00 180.00"
        );
        let arrow = edge.arrowhead.unwrap();
        assert_eq!(arrow.apex, (560.0, 180.0));
        assert_eq!(arrow.left, (550.0, 184.0));
        assert_eq!(arrow.right, (550.0, 176.0));
    }

    #[test]
    fn run_length_ignores_distance() {
        let parent = node("p", 0.0, 0.0, 100.0, 40.0);
        for gap in [20.0, 200.0, 2000.0] {
            let child = node("c", 100.0 + gap, 0.0, 100.0, 40.0);
            let (edge, _) = route(&parent, &child, ConnectorStyle::Orthogonal);
            assert_eq!(edge.points[1].0, 130.0);
        }
    }

    #[test]
    fn aligned_boxes_draw_straight_without_rounding() {
        let parent = node("p", 0.0, 0.0, 100.0, 40.0);
        let child = node("c", 300.0, 0.0, 100.0, 40.0);
        let (edge, _) = route(&parent, &child, ConnectorStyle::Orthogonal);
        assert!(edge
            .segments
            .iter()
            .all(|segment| !matches!(segment, PathSegment::QuadTo { .. })));
    }

    #[test]
    fn direct_has_two_points_and_leftward_edges_flip() {
        let parent = node("p", 0.0, 0.0, 100.0, 40.0);
        let child = node("c", -400.0, 20.0, 50.0, 20.0);
        let (edge, _) = route(&parent, &child, ConnectorStyle::Direct);
        assert_eq!(edge.points.len(), 2);
        assert_eq!(edge.start, (0.0, 20.0));
        assert_eq!(edge.end, (-350.0, 30.0));
    }

    #[test]
    fn forced_vertical_axis_uses_top_and_bottom() {
        let parent = node("p", 0.0, 0.0, 100.0, 40.0);
        let child = node("c", 400.0, 60.0, 100.0, 40.0);
        let (start, end) = edge_sides(&parent, &child, Some(AnchorAxis::Vertical));
        assert_eq!((start, end), (EdgeSide::Bottom, EdgeSide::Top));
        assert_eq!(edge_sides(&parent, &child, None), (EdgeSide::Right, EdgeSide::Left));
    }

    #[test]
    fn quadratic_control_favours_minor_axis() {
        let ctrl = quadratic_control((0.0, 0.0), (100.0, 50.0), true, 0.8);
        assert!((ctrl.0 - 20.0).abs() < 1e-4);
        assert!((ctrl.1 - 40.0).abs() < 1e-4);
    }

    #[test]
    fn cubic_gets_gradient_and_tangent_arrow() {
        let parent = node("p", 0.0, 0.0, 100.0, 40.0);
        let child = node("c", 300.0, 100.0, 100.0, 40.0);
        let (edge, _) = route(&parent, &child, ConnectorStyle::Cubic);
        assert_eq!(edge.points.len(), 4);
        assert_eq!(edge.points[1], (200.0, 20.0));
        assert_eq!(edge.points[2], (200.0, 120.0));
        assert!(edge.gradient.is_some());
        let arrow = edge.arrowhead.unwrap();
        // The S-curve arrives heading right.
        assert!(arrow.left.0 < 300.0 && arrow.right.0 < 300.0);
    }

    #[test]
    fn column_edges_pass_left_of_stacked_siblings() {
        let config = ConnectorConfig::default();
        let head = node("ch1", 0.0, 0.0, 120.0, 40.0);
        let first = node("s1", 24.0, 60.0, 90.0, 30.0);
        let nested = node("s1a", 48.0, 110.0, 90.0, 30.0);
        let second = node("s2", 24.0, 160.0, 90.0, 30.0);
        for style in ConnectorStyle::ALL {
            let mut diagnostics = Vec::new();
            let edge = route_column_connector(&head, &second, style, 24.0, &config, &mut diagnostics);
            assert!(diagnostics.is_empty());
            assert_eq!(edge.start, (12.0, 40.0));
            assert_eq!(edge.end, (24.0, 175.0));
            // Every point of the path stays left of the stacked boxes.
            for t in 0..=20 {
                let t = t as f32 / 20.0;
                let p = match style {
                    ConnectorStyle::Orthogonal => {
                        if t < 0.5 {
                            lerp(edge.points[0], edge.points[1], t * 2.0)
                        } else {
                            lerp(edge.points[1], edge.points[2], t * 2.0 - 1.0)
                        }
                    }
                    ConnectorStyle::Quadratic => quad_point(edge.points[0], edge.points[1], edge.points[2], t),
                    ConnectorStyle::Direct => lerp(edge.start, edge.end, t),
                    ConnectorStyle::Cubic => {
                        cubic_point(edge.points[0], edge.points[1], edge.points[2], edge.points[3], t)
                    }
                };
                for boxed in [&first, &nested] {
                    let inside = p.0 > boxed.x + 1e-3
                        && p.0 < boxed.right()
                        && p.1 > boxed.y
                        && p.1 < boxed.bottom();
                    assert!(!inside, "{style}: {p:?} inside {}", boxed.id);
                }
            }
            let arrow = edge.arrowhead.unwrap();
            if style != ConnectorStyle::Direct {
                assert!(arrow.left.0 < 24.0 && arrow.right.0 < 24.0, "{style}");
            }
        }
    }

    #[test]
    fn column_elbow_has_a_single_corner() {
        let head = node("ch1", 0.0, 0.0, 120.0, 40.0);
        let child = node("s1", 24.0, 60.0, 90.0, 30.0);
        let mut diagnostics = Vec::new();
        let edge = route_column_connector(
            &head,
            &child,
            ConnectorStyle::Orthogonal,
            24.0,
            &ConnectorConfig::default(),
            &mut diagnostics,
        );
        assert_eq!(edge.points, vec![(12.0, 40.0), (12.0, 75.0), (24.0, 75.0)]);
    }

    #[test]
    fn coincident_anchors_drop_the_arrowhead() {
        let parent = node("p", 0.0, 0.0, 100.0, 40.0);
        let child = node("c", 100.0, 0.0, 0.0, 40.0);
        let mut diagnostics = Vec::new();
        let config = ConnectorConfig::default();
        let edge = route_connector(&parent, &child, ConnectorStyle::Quadratic, None, &config, &mut diagnostics);
        assert_eq!(edge.start, edge.end);
        assert!(edge.arrowhead.is_none());
        assert_eq!(
            diagnostics,
            vec![LayoutError::CoincidentAnchors {
                from: "p".into(),
                to: "c".into()
            }]
        );
    }
}
