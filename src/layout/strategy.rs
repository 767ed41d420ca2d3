//! Three-phase skeleton shared by every layout strategy.
//!
//! Phase A assigns the primary-axis coordinate (the axis depth grows along),
//! Phase B accumulates per-side subtree extents and centers each block of
//! children on its parent along the cross axis, Phase C pushes apart same-side
//! siblings that still come too close. Every phase reads the arena tree and
//! writes only into [`Placement`].

use super::*;

/// Floor for every configured margin.
pub(super) const MIN_MARGIN: f32 = 10.0;

pub(super) trait LayoutStrategy: Sync {
    fn compute_base(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement);
    fn compute_cross(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement);
    fn adjust_overlap(&self, tree: &LayoutTree, ctx: &LayoutContext<'_>, state: &mut Placement);
}

pub(super) fn strategy_for(kind: LayoutKind) -> &'static dyn LayoutStrategy {
    match kind {
        LayoutKind::MindMap => &MindMapStrategy,
        LayoutKind::LogicalRight => &LogicalStrategy { side: Side::Right },
        LayoutKind::LogicalLeft => &LogicalStrategy { side: Side::Left },
        LayoutKind::Organization => &OrganizationStrategy,
        LayoutKind::Catalog => &CatalogStrategy,
        LayoutKind::TimelineHorizontal => &HorizontalTimelineStrategy,
        LayoutKind::TimelineVertical => &VerticalTimelineStrategy,
        LayoutKind::Fishbone => &FishboneStrategy,
    }
}

pub(super) struct LayoutContext<'a> {
    pub(super) config: &'a LayoutConfig,
    pub(super) origin: Point,
    pub(super) layer_margin: f32,
    pub(super) sibling_margin: f32,
    pub(super) clearance: f32,
}

impl<'a> LayoutContext<'a> {
    pub(super) fn new(config: &'a LayoutConfig, origin: Option<Point>) -> Self {
        let origin = match origin {
            Some((x, y)) if x.is_finite() && y.is_finite() => (x, y),
            _ => config.default_origin,
        };
        Self {
            config,
            origin,
            layer_margin: clamp_margin(config.layer_spacing),
            sibling_margin: clamp_margin(config.node_spacing),
            clearance: config.overlap_clearance.max(0.0),
        }
    }

    /// Inter-layer gap in front of a node at `layer_index`; the first layer
    /// gets the scaled margin.
    pub(super) fn layer_gap(&self, layer_index: usize) -> f32 {
        if layer_index <= 1 {
            clamp_margin(self.layer_margin * self.config.first_layer_scale)
        } else {
            self.layer_margin
        }
    }

    /// Cross-axis gap between sibling blocks. Phase B reserves it and Phase C
    /// restores it.
    pub(super) fn sibling_gap(&self) -> f32 {
        self.sibling_margin.max(self.clearance)
    }
}

fn clamp_margin(value: f32) -> f32 {
    if value.is_finite() {
        value.max(MIN_MARGIN)
    } else {
        MIN_MARGIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Axis {
    X,
    Y,
}

/// Per-node results written by the phases. `x`/`y` are top-left corners.
#[derive(Debug, Clone)]
pub(super) struct Placement {
    pub(super) x: Vec<f32>,
    pub(super) y: Vec<f32>,
    pub(super) side: Vec<Side>,
    /// Cross-axis extent of each side's child block, indexed by [`side_slot`].
    pub(super) extent: Vec<[f32; 2]>,
}

impl Placement {
    pub(super) fn new(len: usize) -> Self {
        Self {
            x: vec![0.0; len],
            y: vec![0.0; len],
            side: vec![Side::None; len],
            extent: vec![[0.0; 2]; len],
        }
    }

    pub(super) fn coord(&self, idx: NodeIndex, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x[idx],
            Axis::Y => self.y[idx],
        }
    }

    pub(super) fn set_coord(&mut self, idx: NodeIndex, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x[idx] = value,
            Axis::Y => self.y[idx] = value,
        }
    }

    pub(super) fn center(&self, tree: &LayoutTree, idx: NodeIndex, axis: Axis) -> f32 {
        self.coord(idx, axis) + size_on(tree, idx, axis) / 2.0
    }

    /// Moves a node together with every visible descendant.
    pub(super) fn shift_subtree(&mut self, tree: &LayoutTree, idx: NodeIndex, axis: Axis, delta: f32) {
        if delta == 0.0 {
            return;
        }
        for node in tree.visible_preorder_from(idx) {
            let value = self.coord(node, axis) + delta;
            self.set_coord(node, axis, value);
        }
    }
}

pub(super) fn size_on(tree: &LayoutTree, idx: NodeIndex, axis: Axis) -> f32 {
    let node = tree.node(idx);
    match axis {
        Axis::X => node.width,
        Axis::Y => node.height,
    }
}

pub(super) fn side_slot(side: Side) -> usize {
    match side {
        Side::Left | Side::Top => 1,
        Side::Right | Side::Bottom | Side::None => 0,
    }
}

/// Growth direction along the primary axis: `-1` for left/top, `+1` otherwise.
pub(super) fn side_direction(side: Side) -> f32 {
    match side {
        Side::Left | Side::Top => -1.0,
        Side::Right | Side::Bottom | Side::None => 1.0,
    }
}

/// Runs all three phases. The root is centered on the origin before Phase A
/// and never moved afterwards.
pub(super) fn run_strategy(
    strategy: &dyn LayoutStrategy,
    tree: &LayoutTree,
    ctx: &LayoutContext<'_>,
) -> Placement {
    let mut state = Placement::new(tree.len());
    let Some(root) = tree.root() else {
        return state;
    };
    let root_box = tree.node(root);
    state.x[root] = ctx.origin.0 - root_box.width / 2.0;
    state.y[root] = ctx.origin.1 - root_box.height / 2.0;

    strategy.compute_base(tree, ctx, &mut state);
    strategy.compute_cross(tree, ctx, &mut state);
    strategy.adjust_overlap(tree, ctx, &mut state);
    state
}

/// Cross-axis space a child block occupies inside its parent's side block.
pub(super) fn block_size(tree: &LayoutTree, state: &Placement, idx: NodeIndex, axis: Axis) -> f32 {
    let [a, b] = state.extent[idx];
    size_on(tree, idx, axis).max(a).max(b)
}

/// Places `child` one gap beyond `parent` along `axis`, on the side `direction` points to.
pub(super) fn place_beyond(
    tree: &LayoutTree,
    state: &mut Placement,
    parent: NodeIndex,
    child: NodeIndex,
    axis: Axis,
    direction: f32,
    gap: f32,
) {
    let value = if direction < 0.0 {
        state.coord(parent, axis) - gap - size_on(tree, child, axis)
    } else {
        state.coord(parent, axis) + size_on(tree, parent, axis) + gap
    };
    state.set_coord(child, axis, value);
}

/// Post-order: `extent = Σ childBlock + (childCount + 1) · margin` per side.
pub(super) fn accumulate_extents(tree: &LayoutTree, state: &mut Placement, axis: Axis, margin: f32) {
    for idx in tree.visible_postorder() {
        let mut sums = [0.0f32; 2];
        let mut counts = [0usize; 2];
        for &child in tree.visible_children(idx) {
            let slot = side_slot(state.side[child]);
            sums[slot] += block_size(tree, state, child, axis);
            counts[slot] += 1;
        }
        for slot in 0..2 {
            state.extent[idx][slot] = if counts[slot] == 0 {
                0.0
            } else {
                sums[slot] + (counts[slot] as f32 + 1.0) * margin
            };
        }
    }
}

/// Pre-order: centers each side's block of children on the parent's cross
/// midpoint and walks the children in order.
pub(super) fn distribute_cross(tree: &LayoutTree, state: &mut Placement, axis: Axis, margin: f32) {
    for idx in tree.visible_preorder() {
        let center = state.center(tree, idx, axis);
        for slot in 0..2 {
            let extent = state.extent[idx][slot];
            if extent <= 0.0 {
                continue;
            }
            let mut top = center - extent / 2.0 + margin;
            for &child in tree.visible_children(idx) {
                if side_slot(state.side[child]) != slot {
                    continue;
                }
                let block = block_size(tree, state, child, axis);
                let size = size_on(tree, child, axis);
                state.set_coord(child, axis, top + (block - size) / 2.0);
                top += block + margin;
            }
        }
    }
}

/// Mind-map side rule: first-layer nodes honour an explicit left/right
/// preference, otherwise alternate right/left by index; deeper nodes inherit.
pub(super) fn assign_alternating_sides(tree: &LayoutTree, state: &mut Placement) {
    let Some(root) = tree.root() else {
        return;
    };
    for (index, &child) in tree.visible_children(root).iter().enumerate() {
        let preferred = tree.node(child).preferred_side;
        state.side[child] = if preferred.is_horizontal() {
            preferred
        } else if index % 2 == 0 {
            Side::Right
        } else {
            Side::Left
        };
    }
    inherit_sides(tree, state);
}

pub(super) fn inherit_sides(tree: &LayoutTree, state: &mut Placement) {
    let Some(root) = tree.root() else {
        return;
    };
    for idx in tree.visible_preorder() {
        let Some(parent) = tree.node(idx).parent else {
            continue;
        };
        if parent != root {
            state.side[idx] = state.side[parent];
        }
    }
}

pub(super) fn force_side(tree: &LayoutTree, state: &mut Placement, side: Side) {
    for idx in tree.visible_preorder() {
        if tree.node(idx).parent.is_some() {
            state.side[idx] = side;
        }
    }
}

/// Phase A for trees growing along `axis`: each node sits one layer gap past
/// its parent in its side's direction.
pub(super) fn place_layers(
    tree: &LayoutTree,
    state: &mut Placement,
    axis: Axis,
    gap_for_layer: impl Fn(usize) -> f32,
) {
    for idx in tree.visible_preorder() {
        let node = tree.node(idx);
        let Some(parent) = node.parent else {
            continue;
        };
        let gap = gap_for_layer(node.layer_index);
        let direction = side_direction(state.side[idx]);
        place_beyond(tree, state, parent, idx, axis, direction, gap);
    }
}
