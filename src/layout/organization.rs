use super::*;

/// Top-down org chart: the mind-map skeleton with the axes swapped.
pub(super) struct OrganizationStrategy;

impl LayoutStrategy for OrganizationStrategy {
    fn compute_base(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        force_side(tree, state, Side::Bottom);
        place_layers(tree, state, Axis::Y, |layer| ctx.layer_gap(layer));
    }

    fn compute_cross(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        accumulate_extents(tree, state, Axis::X, ctx.sibling_gap());
        distribute_cross(tree, state, Axis::X, ctx.sibling_gap());
    }

    fn adjust_overlap(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        resolve_sibling_overlap(tree, state, Axis::X, ctx);
    }
}
