use super::*;

/// Linear scan over spans sorted along one axis. When `start[i] + size[i] +
/// clearance` reaches past `start[i + 1]`, span `i + 1` and every later span
/// move by the same delta so the gap becomes exactly `gap`. Returns the total
/// delta applied to each span.
pub(super) fn cascade_gaps(starts: &mut [f32], sizes: &[f32], clearance: f32, gap: f32) -> Vec<f32> {
    let mut deltas = vec![0.0f32; starts.len()];
    for i in 0..starts.len().saturating_sub(1) {
        let current_end = starts[i] + sizes[i];
        let next_start = starts[i + 1];
        if current_end + clearance <= next_start {
            continue;
        }
        let delta = current_end + gap - next_start;
        if delta <= 0.0 {
            continue;
        }
        for j in (i + 1)..starts.len() {
            starts[j] += delta;
            deltas[j] += delta;
        }
    }
    deltas
}

/// Phase C for side-grouped layouts: every group of same-side siblings is
/// separated along `axis`; a shifted sibling carries its whole subtree.
pub(super) fn resolve_sibling_overlap(
    tree: &LayoutTree,
    state: &mut Placement,
    axis: Axis,
    ctx: &LayoutContext<'_>,
) {
    for idx in tree.visible_preorder() {
        for slot in 0..2 {
            let group: Vec<NodeIndex> = tree
                .visible_children(idx)
                .iter()
                .copied()
                .filter(|&child| side_slot(state.side[child]) == slot)
                .collect();
            separate_group(tree, state, &group, axis, ctx, true);
        }
    }
}

/// Applies [`cascade_gaps`] to `group` in order. With `carry_subtree` the
/// delta moves each member's visible descendants too.
pub(super) fn separate_group(
    tree: &LayoutTree,
    state: &mut Placement,
    group: &[NodeIndex],
    axis: Axis,
    ctx: &LayoutContext<'_>,
    carry_subtree: bool,
) {
    let sizes: Vec<f32> = group.iter().map(|&idx| size_on(tree, idx, axis)).collect();
    separate_spans(tree, state, group, &sizes, axis, ctx.clearance, ctx.sibling_gap(), carry_subtree);
}

#[allow(clippy::too_many_arguments)]
pub(super) fn separate_spans(
    tree: &LayoutTree,
    state: &mut Placement,
    group: &[NodeIndex],
    sizes: &[f32],
    axis: Axis,
    clearance: f32,
    gap: f32,
    carry_subtree: bool,
) {
    if group.len() < 2 {
        return;
    }
    let mut starts: Vec<f32> = group.iter().map(|&idx| state.coord(idx, axis)).collect();
    let deltas = cascade_gaps(&mut starts, sizes, clearance, gap);
    for (&idx, &delta) in group.iter().zip(&deltas) {
        if delta == 0.0 {
            continue;
        }
        tracing::trace!(node = %tree.node(idx).id, ?axis, delta, "separating sibling");
        if carry_subtree {
            state.shift_subtree(tree, idx, axis, delta);
        } else {
            let value = state.coord(idx, axis) + delta;
            state.set_coord(idx, axis, value);
        }
    }
}

/// Coarse fallback over an already placed tree: every node that comes too close
/// to any node placed before it is nudged down-right until it is clear.
pub(super) fn auto_arrange_placement(tree: &LayoutTree, state: &mut Placement, ctx: &LayoutContext<'_>) {
    if tree.is_empty() {
        return;
    }
    let cfg = &ctx.config.auto_arrange;
    let h_spacing = cfg.horizontal_spacing.max(MIN_MARGIN);
    let v_spacing = cfg.vertical_spacing.max(MIN_MARGIN);
    let trigger = cfg.trigger_ratio.max(0.0);
    let shift = cfg.shift_ratio.max(0.1);
    let order = tree.visible_preorder();

    for (pos, &later) in order.iter().enumerate().skip(1) {
        let mut shifts = 0usize;
        while order[..pos]
            .iter()
            .any(|&earlier| too_close(tree, state, earlier, later, h_spacing * trigger, v_spacing * trigger))
        {
            if shifts >= cfg.max_shifts_per_node {
                tracing::warn!(node = %tree.node(later).id, shifts, "auto-arrange gave up on node");
                break;
            }
            state.x[later] += h_spacing * shift;
            state.y[later] += v_spacing * shift;
            shifts += 1;
        }
        if shifts > 0 {
            tracing::trace!(node = %tree.node(later).id, shifts, "auto-arrange nudged node");
        }
    }
}

fn too_close(
    tree: &LayoutTree,
    state: &Placement,
    a: NodeIndex,
    b: NodeIndex,
    pad_x: f32,
    pad_y: f32,
) -> bool {
    let dx = (state.center(tree, a, Axis::X) - state.center(tree, b, Axis::X)).abs();
    let dy = (state.center(tree, a, Axis::Y) - state.center(tree, b, Axis::Y)).abs();
    let half_w = (tree.node(a).width + tree.node(b).width) / 2.0;
    let half_h = (tree.node(a).height + tree.node(b).height) / 2.0;
    dx < half_w + pad_x && dy < half_h + pad_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeDescriptor;

    #[test]
    fn cascade_raises_next_sibling_and_shifts_the_rest() {
        let mut starts = vec![0.0, 30.0, 55.0];
        let sizes = vec![40.0, 40.0, 40.0];
        let deltas = cascade_gaps(&mut starts, &sizes, 10.0, 10.0);
        assert!(starts[1] >= 50.0);
        assert_eq!(deltas[1], 20.0);
        for i in 0..2 {
            assert!(starts[i + 1] - (starts[i] + sizes[i]) >= 10.0);
        }
        assert_eq!(starts, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn cascade_leaves_clear_spans_alone() {
        let mut starts = vec![0.0, 60.0, 200.0];
        let deltas = cascade_gaps(&mut starts, &[40.0, 40.0, 40.0], 10.0, 10.0);
        assert_eq!(deltas, vec![0.0, 0.0, 0.0]);
        assert_eq!(starts, vec![0.0, 60.0, 200.0]);
    }

    #[test]
    fn separated_sibling_carries_its_subtree() {
        let descriptors = vec![
            NodeDescriptor::new("r", None, 50.0, 40.0),
            NodeDescriptor::new("a", Some("r"), 50.0, 40.0),
            NodeDescriptor::new("b", Some("r"), 50.0, 40.0),
            NodeDescriptor::new("b1", Some("b"), 50.0, 40.0),
        ];
        let tree = LayoutTree::build(&descriptors).0;
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, None);
        let mut state = Placement::new(tree.len());
        force_side(&tree, &mut state, Side::Right);
        let (a, b, b1) = (1, 2, 3);
        state.y[a] = 0.0;
        state.y[b] = 20.0;
        state.y[b1] = 20.0;
        resolve_sibling_overlap(&tree, &mut state, Axis::Y, &ctx);
        assert_eq!(state.y[b], 40.0 + ctx.sibling_gap());
        assert_eq!(state.y[b1], state.y[b]);
    }

    #[test]
    fn auto_arrange_separates_stacked_nodes() {
        let descriptors = vec![
            NodeDescriptor::new("r", None, 100.0, 40.0),
            NodeDescriptor::new("a", Some("r"), 100.0, 40.0),
        ];
        let tree = LayoutTree::build(&descriptors).0;
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, None);
        let mut state = Placement::new(tree.len());
        auto_arrange_placement(&tree, &mut state, &ctx);
        assert_eq!((state.x[0], state.y[0]), (0.0, 0.0));
        assert!(!too_close(&tree, &state, 0, 1, 20.0, 10.0));
        assert!(state.x[1] > 0.0 && state.y[1] > 0.0);
    }
}
