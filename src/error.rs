use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    Structural,
    DegenerateGeometry,
    Configuration,
}

/// A problem absorbed during a layout pass. The offending node, link or setting
/// is dropped or replaced by a default; the rest of the pass proceeds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("duplicate node id `{id}`; keeping the first occurrence")]
    DuplicateId { id: String },
    #[error("node `{id}` declares no parent but `{root}` is already the root")]
    ExtraRoot { id: String, root: String },
    #[error("node `{id}` references unknown parent `{parent_id}`")]
    UnresolvedParent { id: String, parent_id: String },
    #[error("node `{id}` is part of a parent cycle")]
    CyclicParent { id: String },
    #[error("node `{id}` is not reachable from the root")]
    Unreachable { id: String },
    #[error("no root node among {count} descriptors")]
    MissingRoot { count: usize },
    #[error("cross-link `{from}` -> `{to}` references an unknown node")]
    UnknownCrossLinkEndpoint { from: String, to: String },
    #[error("cross-link on `{id}` links the node to itself")]
    SelfCrossLink { id: String },
    #[error("duplicate cross-link between `{from}` and `{to}`")]
    DuplicateCrossLink { from: String, to: String },
    #[error("node `{id}` has invalid size {width}x{height}; clamped to zero")]
    InvalidSize { id: String, width: f32, height: f32 },
    #[error("connector `{from}` -> `{to}` has coincident anchors; arrowhead skipped")]
    CoincidentAnchors { from: String, to: String },
    #[error("unknown layout kind `{0}`; using mind-map")]
    UnknownLayoutKind(String),
    #[error("unknown connector style `{0}`; using orthogonal")]
    UnknownConnectorStyle(String),
}

impl LayoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LayoutError::DuplicateId { .. }
            | LayoutError::ExtraRoot { .. }
            | LayoutError::UnresolvedParent { .. }
            | LayoutError::CyclicParent { .. }
            | LayoutError::Unreachable { .. }
            | LayoutError::MissingRoot { .. }
            | LayoutError::UnknownCrossLinkEndpoint { .. }
            | LayoutError::SelfCrossLink { .. }
            | LayoutError::DuplicateCrossLink { .. } => ErrorCategory::Structural,
            LayoutError::InvalidSize { .. } | LayoutError::CoincidentAnchors { .. } => {
                ErrorCategory::DegenerateGeometry
            }
            LayoutError::UnknownLayoutKind(_) | LayoutError::UnknownConnectorStyle(_) => {
                ErrorCategory::Configuration
            }
        }
    }
}

/// Records a diagnostic and mirrors it to the `tracing` stream.
pub(crate) fn report(diagnostics: &mut Vec<LayoutError>, error: LayoutError) {
    tracing::warn!(category = ?error.category(), "{error}");
    diagnostics.push(error);
}
