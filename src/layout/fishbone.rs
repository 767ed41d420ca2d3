use super::*;

const MIN_ANGLE_DEGREES: f32 = 5.0;
const MAX_ANGLE_DEGREES: f32 = 85.0;
const FALLBACK_ANGLE_DEGREES: f32 = 45.0;

/// Trigonometry of the skeleton angle, clamped away from 0° and 90°.
#[derive(Debug, Clone, Copy)]
struct Skeleton {
    cos: f32,
    sin: f32,
    cot: f32,
}

impl Skeleton {
    fn new(ctx: &LayoutContext<'_>) -> Self {
        let degrees = ctx.config.fishbone.angle_degrees;
        let degrees = if degrees.is_finite() {
            degrees.clamp(MIN_ANGLE_DEGREES, MAX_ANGLE_DEGREES)
        } else {
            FALLBACK_ANGLE_DEGREES
        };
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            cos,
            sin,
            cot: cos / sin,
        }
    }

    fn pitch(&self, ctx: &LayoutContext<'_>) -> f32 {
        ctx.sibling_gap().max(ctx.layer_margin * self.sin)
    }
}

/// Mind-map sides with angled bones: the primary gap shrinks by `cos θ`, and
/// every branch slides outward in proportion to its cross offset from its
/// parent so the connectors read as slanted ribs.
pub(super) struct FishboneStrategy;

impl LayoutStrategy for FishboneStrategy {
    fn compute_base(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let skeleton = Skeleton::new(ctx);
        assign_alternating_sides(tree, state);
        place_layers(tree, state, Axis::X, |layer| {
            (ctx.layer_gap(layer) * skeleton.cos).max(MIN_MARGIN)
        });
    }

    fn compute_cross(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let skeleton = Skeleton::new(ctx);
        let pitch = skeleton.pitch(ctx);
        accumulate_extents(tree, state, Axis::Y, pitch);
        distribute_cross(tree, state, Axis::Y, pitch);

        // Parents move before their children, so offsets compound down the tree.
        for idx in tree.visible_preorder() {
            let Some(parent) = tree.node(idx).parent else {
                continue;
            };
            let offset = state.center(tree, idx, Axis::Y) - state.center(tree, parent, Axis::Y);
            let shift = offset.abs() * skeleton.cot * side_direction(state.side[idx]);
            state.shift_subtree(tree, idx, Axis::X, shift);
        }
    }

    fn adjust_overlap(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        resolve_sibling_overlap(tree, state, Axis::Y, ctx);
    }
}
