//! Pure evaluation pieces: condition checks, response filtering, and
//! eligible-next branch resolution.
//!
//! Everything here is side-effect-free with respect to traversal state -
//! evaluating a candidate never triggers entry or a cascade.

use log::warn;

use crate::context::ConversationContext;
use crate::graph::{Condition, ConversationGraph, DialogNode, NodeId, Response};

/// Evaluate a condition list against the flag store, in order.
///
/// The list passes when every condition's live flag value equals its
/// required value; the first failure wins. With no registered flag store
/// conditions fail open: the list is treated as passed.
pub fn conditions_pass(ctx: &ConversationContext, conditions: &[Condition]) -> bool {
    if conditions.is_empty() {
        return true;
    }
    if !ctx.has_flag_store() {
        warn!("No flag store registered; treating {} condition(s) as passed", conditions.len());
        return true;
    }
    conditions
        .iter()
        .all(|c| ctx.flag_value(&c.flag_key) == c.required_value)
}

/// Compute the offerable subsequence of a node's responses.
///
/// A response with no conditions is always offered. The result is a snapshot
/// taken once per node entry; the engine never re-filters while the node
/// stays current.
pub fn filter_responses(ctx: &ConversationContext, responses: &[Response]) -> Vec<Response> {
    responses
        .iter()
        .filter(|r| conditions_pass(ctx, &r.conditions))
        .cloned()
        .collect()
}

/// Build the candidate list for explicit advance/selection from `from`.
///
/// Candidates with conditions that currently pass are preferred; only when
/// none of those exist do unconditioned entries qualify. Original authored
/// order is preserved within each tier, and the resolved continuation is the
/// first element of the returned list. Entries referencing nodes missing
/// from the graph are skipped.
pub fn eligible_next(
    ctx: &ConversationContext,
    graph: &ConversationGraph,
    from: &DialogNode,
) -> Vec<NodeId> {
    let mut conditioned = Vec::new();
    let mut unconditioned = Vec::new();

    for &id in &from.next_nodes {
        let Some(candidate) = graph.node(id) else {
            warn!("Node {} lists missing continuation {}; skipping it", from.id, id);
            continue;
        };
        if candidate.conditions.is_empty() {
            unconditioned.push(id);
        } else if conditions_pass(ctx, &candidate.conditions) {
            conditioned.push(id);
        }
    }

    if conditioned.is_empty() {
        unconditioned
    } else {
        conditioned
    }
}
