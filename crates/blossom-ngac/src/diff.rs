//! # Graph Differ
//!
//! Computes the command sequence that turns a current graph into a desired
//! one. Commands come out in six phases:
//!
//! 1. **create** nodes only in the desired graph, parents first (ties by
//!    name), each carrying its desired parents;
//! 2. **delete** nodes only in the current graph;
//! 3. **assign** desired edges missing from the current graph;
//! 4. **deassign** current edges missing from the desired graph;
//! 5. **associate** desired subject/target pairs with no current association;
//! 6. **dissociate** current pairs missing from the desired graph.
//!
//! Deletion cascades to incident edges, so phases 4 and 6 skip edges with a
//! deleted endpoint. A node present on both sides is left alone even if its
//! type differs, and so is an association pair present on both sides even if
//! its operation sets differ.

use std::collections::{BTreeMap, BTreeSet};

use crate::command::GraphCommand;
use crate::graph::Graph;

/// Commands that turn `current` into `desired`.
pub fn diff(current: &Graph, desired: &Graph) -> Vec<GraphCommand> {
    let mut commands = Vec::new();

    let created = creation_order(current, desired);
    let created_set: BTreeSet<&str> = created.iter().map(String::as_str).collect();
    let deleted: BTreeSet<String> = current
        .nodes()
        .into_iter()
        .filter(|n| !desired.exists(&n.name))
        .map(|n| n.name)
        .collect();

    // ── 1. create ──
    for name in &created {
        let Ok(node_type) = desired.node_type(name) else {
            continue;
        };
        let parents = desired
            .assignments()
            .get(name)
            .map(|p| p.iter().cloned().collect())
            .unwrap_or_default();
        commands.push(GraphCommand::CreateNode {
            name: name.clone(),
            node_type,
            parents,
        });
    }

    // ── 2. delete ──
    for name in &deleted {
        commands.push(GraphCommand::DeleteNode { name: name.clone() });
    }

    // ── 3. assign ──
    for (child, parents) in desired.assignments() {
        if created_set.contains(child.as_str()) {
            continue;
        }
        for parent in parents {
            if !current.is_assigned(child, parent) {
                commands.push(GraphCommand::Assign {
                    child: child.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    // ── 4. deassign ──
    for (child, parents) in current.assignments() {
        if deleted.contains(child) {
            continue;
        }
        for parent in parents {
            if !deleted.contains(parent) && !desired.is_assigned(child, parent) {
                commands.push(GraphCommand::Deassign {
                    child: child.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    // ── 5. associate ──
    for (subject, targets) in desired.associations() {
        for (target, ops) in targets {
            if current.association(subject, target).is_none() {
                commands.push(GraphCommand::Associate {
                    subject: subject.clone(),
                    target: target.clone(),
                    operations: ops.clone(),
                });
            }
        }
    }

    // ── 6. dissociate ──
    for (subject, targets) in current.associations() {
        if deleted.contains(subject) {
            continue;
        }
        for target in targets.keys() {
            if !deleted.contains(target) && desired.association(subject, target).is_none() {
                commands.push(GraphCommand::Dissociate {
                    subject: subject.clone(),
                    target: target.clone(),
                });
            }
        }
    }

    commands
}

/// Nodes to create, ordered so that every created parent precedes its
/// children. Among nodes whose created parents are all placed, the smallest
/// name goes first.
fn creation_order(current: &Graph, desired: &Graph) -> Vec<String> {
    let pending: BTreeSet<String> = desired
        .nodes()
        .into_iter()
        .filter(|n| !current.exists(&n.name))
        .map(|n| n.name)
        .collect();

    // Unplaced created parents per created node.
    let mut blockers: BTreeMap<&str, BTreeSet<&str>> = pending
        .iter()
        .map(|name| {
            let parents = desired
                .assignments()
                .get(name)
                .map(|ps| {
                    ps.iter()
                        .map(String::as_str)
                        .filter(|p| pending.contains(*p))
                        .collect()
                })
                .unwrap_or_default();
            (name.as_str(), parents)
        })
        .collect();

    let mut ready: BTreeSet<&str> = blockers
        .iter()
        .filter(|(_, b)| b.is_empty())
        .map(|(n, _)| *n)
        .collect();
    let mut order = Vec::with_capacity(pending.len());

    while let Some(next) = ready.pop_first() {
        blockers.remove(next);
        order.push(next.to_string());
        for (name, b) in blockers.iter_mut() {
            if b.remove(next) && b.is_empty() {
                ready.insert(*name);
            }
        }
    }

    // A desired graph is acyclic, so nothing is left over.
    debug_assert!(blockers.is_empty());
    order
}
