//! # Permission Decider
//!
//! Resolves the operations a user holds on a target node:
//!
//! ```text
//!   permissions(user, target) = ⋃ ops(ua → t)
//!       for every association ua → t where
//!           ua ∈ ancestors(user)
//!           t  ∈ {target} ∪ ancestors(target)
//! ```
//!
//! [`Decider::list_permissions`] reports a missing node as a lookup error.
//! The checks built on it fail closed: an unknown user or target holds
//! nothing, and checking against it is a denial.

use std::collections::BTreeSet;

use blossom_core::{BlossomError, GraphError, Operation, WILDCARD};

use crate::graph::Graph;

/// The operation set a user holds on a target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    ops: BTreeSet<String>,
}

impl Permissions {
    /// Whether the set grants `operation`. The wildcard grants everything.
    pub fn allows(&self, operation: Operation) -> bool {
        self.allows_str(operation.as_str())
    }

    /// String form of [`Permissions::allows`], for custom operations.
    pub fn allows_str(&self, operation: &str) -> bool {
        self.ops.contains(WILDCARD) || self.ops.contains(operation)
    }

    /// Whether the set grants every operation in `operations`.
    pub fn allows_all(&self, operations: &[Operation]) -> bool {
        operations.iter().all(|op| self.allows(*op))
    }

    /// Whether nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Read-only access decisions over a graph.
#[derive(Debug, Clone, Copy)]
pub struct Decider<'g> {
    graph: &'g Graph,
}

impl<'g> Decider<'g> {
    /// Decide against `graph`.
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Every operation `user` holds on `target`. Errors if either node is
    /// absent.
    pub fn list_permissions(&self, user: &str, target: &str) -> Result<Permissions, GraphError> {
        let mut subjects = self.graph.ancestors(user)?;
        let mut targets = self.graph.ancestors(target)?;
        subjects.insert(user.to_string());
        targets.insert(target.to_string());

        let mut ops = BTreeSet::new();
        for subject in &subjects {
            let Some(granted) = self.graph.associations().get(subject) else {
                continue;
            };
            for (t, t_ops) in granted {
                if targets.contains(t) {
                    ops.extend(t_ops.iter().cloned());
                }
            }
        }
        Ok(Permissions { ops })
    }

    /// Whether `user` holds every operation in `operations` on `target`.
    /// A traversal error is a deny.
    pub fn has_permissions(&self, user: &str, target: &str, operations: &[Operation]) -> bool {
        self.list_permissions(user, target)
            .map(|perms| perms.allows_all(operations))
            .unwrap_or(false)
    }

    /// Require every operation in `operations`, naming the first one missing.
    pub fn authorize(&self, user: &str, target: &str, operations: &[Operation]) -> Result<(), BlossomError> {
        let perms = self.list_permissions(user, target).unwrap_or_default();
        match operations.iter().find(|op| !perms.allows(**op)) {
            Some(missing) => {
                tracing::debug!(user, target, operation = %missing, "access denied");
                Err(BlossomError::access_denied(user, missing.as_str(), target))
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;

    fn graph() -> Graph {
        let mut g = Graph::new();
        g.create_node("pc", NodeType::PolicyClass).unwrap();
        g.create_assigned("docs", NodeType::ObjectAttribute, &["pc"]).unwrap();
        g.create_assigned("secret", NodeType::ObjectAttribute, &["docs"]).unwrap();
        g.create_assigned("file", NodeType::Object, &["secret"]).unwrap();
        g.create_assigned("staff", NodeType::UserAttribute, &["pc"]).unwrap();
        g.create_assigned("admins", NodeType::UserAttribute, &["staff"]).unwrap();
        g.create_assigned("alice", NodeType::User, &["admins"]).unwrap();
        g.create_assigned("bob", NodeType::User, &["staff"]).unwrap();
        g.associate("staff", "docs", ["view_license"]).unwrap();
        g.associate("admins", "secret", ["checkout_license"]).unwrap();
        g
    }

    #[test]
    fn permissions_inherit_through_both_sides() {
        let g = graph();
        let d = Decider::new(&g);
        let alice = d.list_permissions("alice", "file").unwrap();
        assert!(alice.allows(Operation::ViewLicense));
        assert!(alice.allows(Operation::CheckoutLicense));
        let bob = d.list_permissions("bob", "file").unwrap();
        assert!(bob.allows(Operation::ViewLicense));
        assert!(!bob.allows(Operation::CheckoutLicense));
    }

    #[test]
    fn grants_do_not_flow_down_to_parent_targets() {
        let g = graph();
        let d = Decider::new(&g);
        assert!(!d.has_permissions("alice", "docs", &[Operation::CheckoutLicense]));
    }

    #[test]
    fn unknown_user_or_target_fails_closed() {
        let g = graph();
        let d = Decider::new(&g);
        assert_eq!(
            d.list_permissions("mallory", "file"),
            Err(GraphError::NodeNotFound("mallory".into()))
        );
        assert!(!d.has_permissions("alice", "nowhere", &[Operation::ViewLicense]));
        let err = d.authorize("mallory", "file", &[Operation::ViewLicense]).unwrap_err();
        assert!(err.is_access_denied());
    }

    #[test]
    fn wildcard_grants_everything() {
        let mut g = graph();
        g.associate("admins", "pc", ["*"]).unwrap();
        let d = Decider::new(&g);
        assert!(d.has_permissions("alice", "file", &[Operation::DeleteNode]));
        assert!(d.list_permissions("alice", "file").unwrap().allows_str("anything_custom"));
        assert!(!d.has_permissions("bob", "file", &[Operation::DeleteNode]));
    }

    #[test]
    fn check_names_first_missing_operation() {
        let g = graph();
        let d = Decider::new(&g);
        let err = d
            .authorize("bob", "file", &[Operation::ViewLicense, Operation::CheckoutLicense])
            .unwrap_err();
        assert_eq!(
            err,
            BlossomError::access_denied("bob", "checkout_license", "file")
        );
        d.authorize("alice", "file", &[Operation::ViewLicense, Operation::CheckoutLicense])
            .unwrap();
    }
}
