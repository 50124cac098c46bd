//! AO* search over an AND-OR graph of partial tours.
//!
//! Every partial tour is an OR node: it is solved once its cheapest choice of
//! next location leads to a solved node. Leaves that close the tour are
//! solved with their exact cost. Unlike plain A*, the cost of an expanded
//! node is revised from its children and the revision is propagated back up
//! through the graph, reopening ancestors whose estimate dropped.
//!
//! Nodes live in an arena ([`AndOrGraph`]) and refer to their parent and
//! children by [`NodeId`], so the graph has no ownership cycles.
//!
//! # References
//!
//! - Martelli & Montanari (1973), "Additive AND/OR Graphs"
//! - Nilsson (1980), *Principles of Artificial Intelligence*, ch. 3

mod config;
mod graph;
mod runner;

pub use config::AndOrConfig;
pub use graph::{AndOrGraph, AoNode, NodeId, Revision};
pub use runner::{AndOrSearch, AndOrSolver};
