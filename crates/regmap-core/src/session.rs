//! # Session Module
//!
//! A session combines a read-only `LayeredGraph` with the volatile view
//! state of one viewer:
//! - the expanded-id set
//! - the selected node
//! - the breadcrumb of the selection
//!
//! The view state is an explicit value. The free function [`activate`]
//! takes the graph and a state and returns the next state; [`Session`] is a
//! thin owner around that for callers that keep state between requests.
//!
//! View state is never serialized with the snapshot and is cleared on reset.

use crate::breadcrumb::{Breadcrumb, breadcrumb};
use crate::graph::LayeredGraph;
use crate::layout::{Layout, LayoutConfig, assign_layout};
use crate::relations::{Relationship, relations};
use crate::visibility::{VisibleGraph, compute_visible};
use crate::{NodeId, RegmapError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// VIEW STATE
// =============================================================================

/// Locally owned, mutable part of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Ids whose children are revealed.
    pub expanded: BTreeSet<NodeId>,
    /// The active node, if any.
    pub selected: Option<NodeId>,
    /// Path from the furthest ancestor to `selected`.
    pub breadcrumb: Breadcrumb,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }
}

/// Activate a node: expand it, select it and rebuild the breadcrumb.
///
/// Expansion through activation only ever grows the expanded set.
///
/// # Errors
///
/// `NodeNotFound` if `id` is not in the graph; `state` is left untouched.
pub fn activate(graph: &LayeredGraph, state: &ViewState, id: &NodeId) -> Result<ViewState, RegmapError> {
    let crumb = breadcrumb(graph, id)?;

    let mut expanded = state.expanded.clone();
    expanded.insert(id.clone());

    Ok(ViewState {
        expanded,
        selected: Some(id.clone()),
        breadcrumb: crumb,
    })
}

// =============================================================================
// SESSION
// =============================================================================

/// A loaded graph plus the view state of one viewer.
#[derive(Debug, Clone, Default)]
pub struct Session {
    graph: LayeredGraph,
    state: ViewState,
    layout: LayoutConfig,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session over an existing graph.
    #[must_use]
    pub fn with_graph(graph: LayeredGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    /// Use a non-default layout configuration.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn graph(&self) -> &LayeredGraph {
        &self.graph
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Activate a node and return the new breadcrumb.
    pub fn activate(&mut self, id: &NodeId) -> Result<&Breadcrumb, RegmapError> {
        self.state = activate(&self.graph, &self.state, id)?;
        Ok(&self.state.breadcrumb)
    }

    /// Flip one node between expanded and collapsed.
    ///
    /// Returns whether the node is expanded afterwards. Selection is not
    /// changed.
    pub fn toggle(&mut self, id: &NodeId) -> Result<bool, RegmapError> {
        if !self.graph.contains_node(id) {
            return Err(RegmapError::NodeNotFound(id.clone()));
        }
        if self.state.expanded.remove(id) {
            Ok(false)
        } else {
            self.state.expanded.insert(id.clone());
            Ok(true)
        }
    }

    /// Remove one node from the expanded set.
    ///
    /// Returns whether it was expanded.
    pub fn collapse(&mut self, id: &NodeId) -> bool {
        self.state.expanded.remove(id)
    }

    /// Expand every node in the graph.
    pub fn expand_all(&mut self) {
        self.state.expanded = self.graph.node_ids().cloned().collect();
    }

    /// Drop the selection and its breadcrumb, keeping expansion.
    pub fn clear_selection(&mut self) {
        self.state.selected = None;
        self.state.breadcrumb = Breadcrumb::default();
    }

    /// Forget all view state.
    pub fn reset(&mut self) {
        self.state = ViewState::default();
    }

    // -------------------------------------------------------------------------
    // Derived views
    // -------------------------------------------------------------------------

    /// The visible subset under the current expanded set.
    #[must_use]
    pub fn view(&self) -> VisibleGraph<'_> {
        compute_visible(&self.graph, &self.state.expanded)
    }

    /// Grid positions of the current view.
    #[must_use]
    pub fn layout(&self) -> Layout {
        assign_layout(&self.view(), &self.state.expanded, &self.layout)
    }

    /// Relations of a node.
    pub fn relations(&self, id: &NodeId) -> Result<Vec<Relationship<'_>>, RegmapError> {
        relations(&self.graph, id)
    }

    // -------------------------------------------------------------------------
    // Reload
    // -------------------------------------------------------------------------

    /// Swap in a new graph.
    ///
    /// Expanded ids that no longer exist are dropped. The selection survives
    /// only if its node still exists, in which case the breadcrumb is rebuilt
    /// against the new edges.
    pub fn replace_graph(&mut self, graph: LayeredGraph) {
        self.graph = graph;

        let graph = &self.graph;
        self.state.expanded.retain(|id| graph.contains_node(id));

        let selected = self.state.selected.take();
        match selected.and_then(|id| breadcrumb(graph, &id).ok().map(|crumb| (id, crumb))) {
            Some((id, crumb)) => {
                self.state.selected = Some(id);
                self.state.breadcrumb = crumb;
            }
            None => self.state.breadcrumb = Breadcrumb::default(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
