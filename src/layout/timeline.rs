use super::*;

fn timeline_indent(ctx: &LayoutContext<'_>) -> f32 {
    ctx.config.timeline.indent.max(0.0)
}

/// Entries run left to right from the root; each entry's descendants hang
/// beneath it as an indented column.
pub(super) struct HorizontalTimelineStrategy;

impl LayoutStrategy for HorizontalTimelineStrategy {
    fn compute_base(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let Some(root) = tree.root() else {
            return;
        };
        force_side(tree, state, Side::Bottom);
        let indent = timeline_indent(ctx);
        let mut cursor = state.x[root] + tree.node(root).width + ctx.layer_gap(1);
        for &head in tree.visible_children(root) {
            state.side[head] = Side::Right;
            state.x[head] = cursor;
            cursor += column_width(tree, head, indent) + ctx.layer_margin;
        }
    }

    fn compute_cross(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let Some(root) = tree.root() else {
            return;
        };
        let indent = timeline_indent(ctx);
        let center_line = state.center(tree, root, Axis::Y);
        for &head in tree.visible_children(root) {
            state.y[head] = center_line - tree.node(head).height / 2.0;
            stack_column_y(tree, state, head, ctx.sibling_margin);
            indent_column_x(tree, state, head, indent);
        }
    }

    fn adjust_overlap(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let Some(root) = tree.root() else {
            return;
        };
        separate_columns(tree, state, tree.visible_children(root), timeline_indent(ctx), ctx);
    }
}

/// A single downward chain in pre-order at a fixed offset from the root.
pub(super) struct VerticalTimelineStrategy;

impl LayoutStrategy for VerticalTimelineStrategy {
    fn compute_base(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let Some(root) = tree.root() else {
            return;
        };
        force_side(tree, state, Side::Bottom);
        let mut bottom = state.y[root] + tree.node(root).height;
        for (pos, idx) in tree.visible_preorder().into_iter().skip(1).enumerate() {
            let gap = if pos == 0 {
                ctx.layer_gap(1)
            } else {
                ctx.layer_margin
            };
            state.y[idx] = bottom + gap;
            bottom = state.y[idx] + tree.node(idx).height;
        }
    }

    fn compute_cross(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let Some(root) = tree.root() else {
            return;
        };
        let left = state.center(tree, root, Axis::X) + ctx.config.timeline.vertical_offset;
        for idx in tree.visible_preorder().into_iter().skip(1) {
            state.x[idx] = left;
        }
    }

    fn adjust_overlap(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let chain: Vec<NodeIndex> = tree.visible_preorder().into_iter().skip(1).collect();
        let heights: Vec<f32> = chain.iter().map(|&idx| tree.node(idx).height).collect();
        // Chain members are not nested spatially, so each one moves alone.
        separate_spans(
            tree,
            state,
            &chain,
            &heights,
            Axis::Y,
            ctx.clearance,
            ctx.sibling_gap(),
            false,
        );
    }
}
