//! Binding order: dependencies before dependents.

use std::collections::VecDeque;

use fxhash::FxHashSet;
use indexmap::{IndexMap, IndexSet};

use hydra_dom::{BuildSession, NodeId};

use crate::closure::Closure;
use crate::error::BindError;

/// Topologically sorts the settled entities over their dependencies inside
/// the closure (Kahn's algorithm). Ties are broken by settle order, so the
/// result is stable for a given closure.
///
/// # Errors
///
/// [`BindError::DependencyCycle`] with one complete cycle when the
/// entities cannot be ordered.
pub fn binding_order(session: &mut BuildSession<'_>, closure: &Closure) -> Result<Vec<NodeId>, BindError> {
    // --- Edges: node -> its dependencies inside the closure ---
    let mut deps: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
    for &node in &closure.settled {
        let inside: Vec<NodeId> = session
            .dependencies(node)
            .into_iter()
            .filter(|dep| *dep != node && closure.contains(*dep))
            .collect();
        deps.insert(node, inside);
    }

    let mut in_degree: IndexMap<NodeId, usize> = deps.iter().map(|(node, list)| (*node, list.len())).collect();
    let mut dependents: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
    for (node, list) in &deps {
        for dep in list {
            dependents.entry(*dep).or_default().push(*node);
        }
    }

    // --- Kahn ---
    let mut ready: VecDeque<NodeId> = in_degree.iter().filter(|(_, degree)| **degree == 0).map(|(node, _)| *node).collect();
    let mut order = Vec::with_capacity(deps.len());
    while let Some(node) = ready.pop_front() {
        order.push(node);
        for dependent in dependents.get(&node).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(*dependent);
                }
            }
        }
    }

    if order.len() == deps.len() {
        return Ok(order);
    }

    let remaining: IndexSet<NodeId> = in_degree.iter().filter(|(_, degree)| **degree > 0).map(|(node, _)| *node).collect();
    let cycle = trace_cycle(&remaining, &deps);
    let dom = session.dom();
    Err(BindError::DependencyCycle { cycle: cycle.into_iter().map(|node| dom.full_name(node)).collect() })
}

/// Walks dependency edges among the nodes Kahn could not release until a
/// node repeats. Every such node still waits on another one of them, so the
/// walk cannot dead-end. Returns `[a, b, ..., a]`.
fn trace_cycle(remaining: &IndexSet<NodeId>, deps: &IndexMap<NodeId, Vec<NodeId>>) -> Vec<NodeId> {
    let Some(&start) = remaining.first() else {
        return Vec::new();
    };
    let mut path = vec![start];
    let mut visited = FxHashSet::default();
    visited.insert(start);

    let mut current = start;
    loop {
        let next = deps
            .get(&current)
            .and_then(|list| list.iter().find(|dep| remaining.contains(*dep)))
            .copied();
        let Some(next) = next else {
            return path;
        };
        if !visited.insert(next) {
            // Drop the tail that leads into the cycle
            let begin = path.iter().position(|node| *node == next).unwrap_or(0);
            let mut cycle = path.split_off(begin);
            cycle.push(next);
            return cycle;
        }
        path.push(next);
        current = next;
    }
}
