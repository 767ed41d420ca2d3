use super::*;

// Column helpers shared with the horizontal timeline: a first-layer node heads
// a column and its visible descendants hang beneath it as one indented chain.

/// Width of a column: the widest descendant once its indent is added.
pub(super) fn column_width(tree: &LayoutTree, head: NodeIndex, indent: f32) -> f32 {
    let base_layer = tree.node(head).layer_index;
    tree.visible_preorder_from(head)
        .into_iter()
        .map(|idx| {
            let node = tree.node(idx);
            (node.layer_index - base_layer) as f32 * indent + node.width
        })
        .fold(0.0, f32::max)
}

/// Stacks every visible descendant of `head` below the previous one in pre-order.
pub(super) fn stack_column_y(tree: &LayoutTree, state: &mut Placement, head: NodeIndex, gap: f32) {
    let mut bottom = state.y[head] + tree.node(head).height;
    for idx in tree.visible_preorder_from(head).into_iter().skip(1) {
        state.y[idx] = bottom + gap;
        bottom = state.y[idx] + tree.node(idx).height;
    }
}

/// Indents each descendant of `head` by `indent` relative to its parent.
pub(super) fn indent_column_x(tree: &LayoutTree, state: &mut Placement, head: NodeIndex, indent: f32) {
    for idx in tree.visible_preorder_from(head).into_iter().skip(1) {
        if let Some(parent) = tree.node(idx).parent {
            state.x[idx] = state.x[parent] + indent;
        }
    }
}

pub(super) fn separate_columns(
    tree: &LayoutTree,
    state: &mut Placement,
    heads: &[NodeIndex],
    indent: f32,
    ctx: &LayoutContext<'_>,
) {
    let widths: Vec<f32> = heads
        .iter()
        .map(|&head| column_width(tree, head, indent))
        .collect();
    separate_spans(
        tree,
        state,
        heads,
        &widths,
        Axis::X,
        ctx.clearance,
        ctx.sibling_gap(),
        true,
    );
}

fn catalog_indent(ctx: &LayoutContext<'_>) -> f32 {
    ctx.config.catalog.indent.max(0.0)
}

/// Two-tier catalog: first-layer columns spread below the root, deeper levels
/// chained vertically inside each column.
pub(super) struct CatalogStrategy;

impl LayoutStrategy for CatalogStrategy {
    fn compute_base(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let Some(root) = tree.root() else {
            return;
        };
        force_side(tree, state, Side::Bottom);
        let first_gap = ctx.layer_gap(1);
        for &head in tree.visible_children(root) {
            place_beyond(tree, state, root, head, Axis::Y, 1.0, first_gap);
            stack_column_y(tree, state, head, ctx.sibling_margin);
        }
    }

    fn compute_cross(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let Some(root) = tree.root() else {
            return;
        };
        let indent = catalog_indent(ctx);
        let heads = tree.visible_children(root);
        let widths: Vec<f32> = heads
            .iter()
            .map(|&head| column_width(tree, head, indent))
            .collect();
        let margin = ctx.sibling_gap();
        let extent = if heads.is_empty() {
            0.0
        } else {
            widths.iter().sum::<f32>() + (heads.len() as f32 + 1.0) * margin
        };
        state.extent[root] = [extent, 0.0];

        let mut left = state.center(tree, root, Axis::X) - extent / 2.0 + margin;
        for (&head, width) in heads.iter().zip(widths) {
            state.x[head] = left;
            indent_column_x(tree, state, head, indent);
            left += width + margin;
        }
    }

    fn adjust_overlap(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement) {
        let Some(root) = tree.root() else {
            return;
        };
        separate_columns(tree, state, tree.visible_children(root), catalog_indent(ctx), ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeDescriptor;

    fn catalog() -> (LayoutTree, Placement) {
        let descriptors = vec![
            NodeDescriptor::new("book", None, 160.0, 50.0),
            NodeDescriptor::new("ch1", Some("book"), 100.0, 30.0),
            NodeDescriptor::new("s1", Some("ch1"), 90.0, 24.0),
            NodeDescriptor::new("s1a", Some("s1"), 90.0, 24.0),
            NodeDescriptor::new("s2", Some("ch1"), 90.0, 24.0),
            NodeDescriptor::new("ch2", Some("book"), 100.0, 30.0),
        ];
        let tree = LayoutTree::build(&descriptors).0;
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, None);
        let state = run_strategy(&CatalogStrategy, &tree, &ctx);
        (tree, state)
    }

    #[test]
    fn column_width_includes_indent() {
        let (tree, _) = catalog();
        let ch1 = tree.index_of("ch1").unwrap();
        // s1a sits two levels under ch1: 2 * 24 + 90.
        assert_eq!(column_width(&tree, ch1, 24.0), 138.0);
    }

    #[test]
    fn first_layer_spreads_below_root() {
        let (tree, state) = catalog();
        let ch1 = tree.index_of("ch1").unwrap();
        let ch2 = tree.index_of("ch2").unwrap();
        assert_eq!(state.y[ch1], state.y[ch2]);
        assert!((state.y[ch1] - (25.0 + 60.0)).abs() < 1e-3);
        assert!(state.x[ch1] + 138.0 <= state.x[ch2]);
    }

    #[test]
    fn deeper_levels_chain_downwards_with_indent() {
        let (tree, state) = catalog();
        let idx = |id: &str| tree.index_of(id).unwrap();
        let order = ["ch1", "s1", "s1a", "s2"];
        for pair in order.windows(2) {
            let (upper, lower) = (idx(pair[0]), idx(pair[1]));
            assert!(state.y[lower] >= state.y[upper] + tree.node(upper).height + MIN_MARGIN);
        }
        assert_eq!(state.x[idx("s1")], state.x[idx("ch1")] + 24.0);
        assert_eq!(state.x[idx("s1a")], state.x[idx("s1")] + 24.0);
        assert_eq!(state.x[idx("s2")], state.x[idx("s1")]);
    }
}
