use super::*;

/// Two-sided horizontal tree: first-layer branches alternate right/left and
/// each side's block is centered on the root.
pub(super) struct MindMapStrategy;

impl LayoutStrategy for MindMapStrategy {
    fn compute_base(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        assign_alternating_sides(tree, state);
        place_layers(tree, state, Axis::X, |layer| ctx.layer_gap(layer));
    }

    fn compute_cross(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        accumulate_extents(tree, state, Axis::Y, ctx.sibling_gap());
        distribute_cross(tree, state, Axis::Y, ctx.sibling_gap());
    }

    fn adjust_overlap(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        resolve_sibling_overlap(tree, state, Axis::Y, ctx);
    }
}

/// Single-sided horizontal tree; every node grows toward `side`.
pub(super) struct LogicalStrategy {
    pub(super) side: Side,
}

impl LayoutStrategy for LogicalStrategy {
    fn compute_base(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        force_side(tree, state, self.side);
        place_layers(tree, state, Axis::X, |layer| ctx.layer_gap(layer));
    }

    fn compute_cross(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        accumulate_extents(tree, state, Axis::Y, ctx.sibling_gap());
        distribute_cross(tree, state, Axis::Y, ctx.sibling_gap());
    }

    fn adjust_overlap(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        resolve_sibling_overlap(tree, state, Axis::Y, ctx);
    }
}
