//! # Policy Graph Store
//!
//! A labeled directed graph with two edge kinds:
//!
//! ```text
//!   assignment   child ──▶ parent          (containment / inheritance, a DAG)
//!   association  UA ──{ops}──▶ target      (grant)
//! ```
//!
//! ## Node-type rules
//!
//! | Child | Allowed parents |
//! |-------|-----------------|
//! | `PC`  | none            |
//! | `OA`  | `OA`, `PC`      |
//! | `UA`  | `UA`, `PC`      |
//! | `O`   | `OA`            |
//! | `U`   | `UA`            |
//!
//! Association subjects are `UA`s; targets may be any node except a `U`.
//!
//! Mutators fail with [`GraphError`] when a referenced node is missing, a
//! name is reused, a type rule is broken, or an assignment would close a
//! cycle. The "every node reaches a policy class" invariant is not enforced
//! per mutation (intermediate states of a batch may be briefly unanchored);
//! [`Graph::validate()`] checks it on a finished graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use blossom_core::{sha256_digest, BlossomError, ContentDigest, GraphError};
use serde::{Deserialize, Serialize};

/// Child → parents.
pub type Assignments = BTreeMap<String, BTreeSet<String>>;

/// Subject → target → operations.
pub type Associations = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

// ─── Node ────────────────────────────────────────────────────────────

/// The five NGAC node types. Serialized with their conventional short names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Policy class: top-level partition.
    #[serde(rename = "PC")]
    PolicyClass,
    /// Object attribute.
    #[serde(rename = "OA")]
    ObjectAttribute,
    /// User attribute.
    #[serde(rename = "UA")]
    UserAttribute,
    /// Object.
    #[serde(rename = "O")]
    Object,
    /// User.
    #[serde(rename = "U")]
    User,
}

impl NodeType {
    /// Short name (`PC`, `OA`, `UA`, `O`, `U`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PolicyClass => "PC",
            Self::ObjectAttribute => "OA",
            Self::UserAttribute => "UA",
            Self::Object => "O",
            Self::User => "U",
        }
    }

    /// Whether a node of this type may be assigned to a node of type `parent`.
    pub fn can_assign_to(&self, parent: NodeType) -> bool {
        use NodeType::*;
        matches!(
            (self, parent),
            (ObjectAttribute, ObjectAttribute)
                | (ObjectAttribute, PolicyClass)
                | (UserAttribute, UserAttribute)
                | (UserAttribute, PolicyClass)
                | (Object, ObjectAttribute)
                | (User, UserAttribute)
        )
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named graph vertex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Globally unique name.
    pub name: String,
    /// Node type.
    #[serde(rename = "type")]
    pub kind: NodeType,
}

impl Node {
    /// Construct a node.
    pub fn new(name: impl Into<String>, kind: NodeType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

// ─── Graph document ──────────────────────────────────────────────────

/// The JSON shape of a graph: what `UpdateGraph` accepts and what is
/// persisted on the ledger.
///
/// ```json
/// {
///   "nodes": [{"name": "blossom", "type": "PC"}, {"name": "a1_ua", "type": "UA"}],
///   "assignments": {"a1_ua": ["blossom"]},
///   "associations": {"a1_ua": {"a1_oa": ["view_agency"]}}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Every node.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Child → parents.
    #[serde(default)]
    pub assignments: Assignments,
    /// Subject → target → operations.
    #[serde(default)]
    pub associations: Associations,
}

// ─── Graph ───────────────────────────────────────────────────────────

/// The policy graph store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GraphDocument", try_from = "GraphDocument")]
pub struct Graph {
    nodes: BTreeMap<String, NodeType>,
    assignments: Assignments,
    associations: Associations,
}

impl Graph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Whether a node with this name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Look up a node.
    pub fn node(&self, name: &str) -> Result<Node, GraphError> {
        self.node_type(name).map(|kind| Node::new(name, kind))
    }

    /// The type of a node.
    pub fn node_type(&self, name: &str) -> Result<NodeType, GraphError> {
        self.nodes
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
    }

    /// All nodes, sorted by name.
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes
            .iter()
            .map(|(name, kind)| Node::new(name.clone(), *kind))
            .collect()
    }

    /// Child → parents for every node that has at least one parent.
    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    /// Subject → target → operations.
    pub fn associations(&self) -> &Associations {
        &self.associations
    }

    /// Direct parents of a node.
    pub fn parents(&self, name: &str) -> Result<BTreeSet<String>, GraphError> {
        self.node_type(name)?;
        Ok(self.assignments.get(name).cloned().unwrap_or_default())
    }

    /// Direct children of a node.
    pub fn children(&self, name: &str) -> Result<BTreeSet<String>, GraphError> {
        self.node_type(name)?;
        Ok(self
            .assignments
            .iter()
            .filter(|(_, parents)| parents.contains(name))
            .map(|(child, _)| child.clone())
            .collect())
    }

    /// Whether `child` is directly assigned to `parent`.
    pub fn is_assigned(&self, child: &str, parent: &str) -> bool {
        self.assignments
            .get(child)
            .is_some_and(|parents| parents.contains(parent))
    }

    /// Every node reachable from `name` through assignment edges, excluding
    /// `name` itself.
    pub fn ancestors(&self, name: &str) -> Result<BTreeSet<String>, GraphError> {
        self.node_type(name)?;
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(name);
        while let Some(current) = queue.pop_front() {
            if let Some(parents) = self.assignments.get(current) {
                for parent in parents {
                    if seen.insert(parent.clone()) {
                        queue.push_back(parent);
                    }
                }
            }
        }
        Ok(seen)
    }

    /// The association operation set between two nodes, if any.
    pub fn association(&self, subject: &str, target: &str) -> Option<&BTreeSet<String>> {
        self.associations.get(subject).and_then(|t| t.get(target))
    }

    // ── Mutators ────────────────────────────────────────────────────

    /// Create a node with no edges.
    pub fn create_node(&mut self, name: &str, kind: NodeType) -> Result<(), GraphError> {
        if name.is_empty() {
            return Err(GraphError::Malformed("node names must be non-empty".into()));
        }
        if self.exists(name) {
            return Err(GraphError::NodeExists(name.to_string()));
        }
        self.nodes.insert(name.to_string(), kind);
        Ok(())
    }

    /// Create a node and assign it to each of `parents`.
    ///
    /// Every parent is checked before the node is inserted, so a failure
    /// leaves the graph unchanged.
    pub fn create_assigned(
        &mut self,
        name: &str,
        kind: NodeType,
        parents: &[&str],
    ) -> Result<(), GraphError> {
        if self.exists(name) {
            return Err(GraphError::NodeExists(name.to_string()));
        }
        for parent in parents {
            let parent_type = self.node_type(parent)?;
            check_assignment_types(name, kind, parent, parent_type)?;
        }
        self.create_node(name, kind)?;
        for parent in parents {
            self.assign(name, parent)?;
        }
        Ok(())
    }

    /// Delete a node together with every edge incident to it.
    pub fn delete_node(&mut self, name: &str) -> Result<(), GraphError> {
        self.node_type(name)?;
        self.nodes.remove(name);
        self.assignments.remove(name);
        self.assignments.retain(|_, parents| {
            parents.remove(name);
            !parents.is_empty()
        });
        self.associations.remove(name);
        self.associations.retain(|_, targets| {
            targets.remove(name);
            !targets.is_empty()
        });
        Ok(())
    }

    /// Assign `child` to `parent`. Assigning an existing edge is a no-op.
    pub fn assign(&mut self, child: &str, parent: &str) -> Result<(), GraphError> {
        let child_type = self.node_type(child)?;
        let parent_type = self.node_type(parent)?;
        check_assignment_types(child, child_type, parent, parent_type)?;

        if self.is_assigned(child, parent) {
            return Ok(());
        }
        if child == parent || self.ancestors(parent)?.contains(child) {
            return Err(GraphError::CycleDetected {
                child: child.to_string(),
                parent: parent.to_string(),
            });
        }

        self.assignments
            .entry(child.to_string())
            .or_default()
            .insert(parent.to_string());
        Ok(())
    }

    /// Remove the assignment of `child` to `parent`.
    pub fn deassign(&mut self, child: &str, parent: &str) -> Result<(), GraphError> {
        self.node_type(child)?;
        self.node_type(parent)?;
        let removed = match self.assignments.get_mut(child) {
            Some(parents) => {
                let removed = parents.remove(parent);
                if parents.is_empty() {
                    self.assignments.remove(child);
                }
                removed
            }
            None => false,
        };
        if !removed {
            return Err(GraphError::AssignmentNotFound {
                child: child.to_string(),
                parent: parent.to_string(),
            });
        }
        Ok(())
    }

    /// Grant `operations` from `subject` to `target`. An existing
    /// association between the same pair is merged with the new set.
    pub fn associate<I, S>(&mut self, subject: &str, target: &str, operations: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let subject_type = self.node_type(subject)?;
        let target_type = self.node_type(target)?;
        if subject_type != NodeType::UserAttribute {
            return Err(GraphError::InvalidAssociation {
                subject: subject.to_string(),
                target: target.to_string(),
                reason: format!("subject must be a UA, found {subject_type}"),
            });
        }
        if target_type == NodeType::User {
            return Err(GraphError::InvalidAssociation {
                subject: subject.to_string(),
                target: target.to_string(),
                reason: "target cannot be a user".into(),
            });
        }

        let ops: BTreeSet<String> = operations.into_iter().map(Into::into).collect();
        if ops.is_empty() {
            return Err(GraphError::EmptyOperationSet {
                subject: subject.to_string(),
                target: target.to_string(),
            });
        }

        self.associations
            .entry(subject.to_string())
            .or_default()
            .entry(target.to_string())
            .or_default()
            .extend(ops);
        Ok(())
    }

    /// Remove the association between `subject` and `target`.
    pub fn dissociate(&mut self, subject: &str, target: &str) -> Result<(), GraphError> {
        self.node_type(subject)?;
        self.node_type(target)?;
        let removed = match self.associations.get_mut(subject) {
            Some(targets) => {
                let removed = targets.remove(target).is_some();
                if targets.is_empty() {
                    self.associations.remove(subject);
                }
                removed
            }
            None => false,
        };
        if !removed {
            return Err(GraphError::AssociationNotFound {
                subject: subject.to_string(),
                target: target.to_string(),
            });
        }
        Ok(())
    }

    // ── Consistency ─────────────────────────────────────────────────

    /// Check that every non-policy-class node reaches a policy class.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (name, kind) in &self.nodes {
            if *kind == NodeType::PolicyClass {
                continue;
            }
            let anchored = self
                .ancestors(name)?
                .iter()
                .any(|a| self.nodes.get(a) == Some(&NodeType::PolicyClass));
            if !anchored {
                return Err(GraphError::Unanchored(name.clone()));
            }
        }
        Ok(())
    }

    // ── Documents ───────────────────────────────────────────────────

    /// Export as a [`GraphDocument`].
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes(),
            assignments: self.assignments.clone(),
            associations: self.associations.clone(),
        }
    }

    /// Build a graph from a document, applying every store rule and the
    /// anchoring check.
    pub fn from_document(doc: GraphDocument) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for node in &doc.nodes {
            graph.create_node(&node.name, node.kind)?;
        }
        for (child, parents) in &doc.assignments {
            for parent in parents {
                graph.assign(child, parent)?;
            }
        }
        for (subject, targets) in &doc.associations {
            for (target, ops) in targets {
                graph.associate(subject, target, ops.iter().cloned())?;
            }
        }
        graph.validate()?;
        Ok(graph)
    }

    /// Parse a JSON graph document.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let doc: GraphDocument =
            serde_json::from_str(json).map_err(|e| GraphError::Malformed(e.to_string()))?;
        Self::from_document(doc)
    }

    /// Render as a JSON graph document.
    pub fn to_json(&self) -> Result<String, BlossomError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    /// SHA-256 fingerprint of the graph document.
    pub fn digest(&self) -> Result<ContentDigest, BlossomError> {
        sha256_digest(&self.to_document())
    }
}

impl From<Graph> for GraphDocument {
    fn from(graph: Graph) -> Self {
        graph.to_document()
    }
}

impl TryFrom<GraphDocument> for Graph {
    type Error = GraphError;

    fn try_from(doc: GraphDocument) -> Result<Self, Self::Error> {
        Graph::from_document(doc)
    }
}

fn check_assignment_types(
    child: &str,
    child_type: NodeType,
    parent: &str,
    parent_type: NodeType,
) -> Result<(), GraphError> {
    if child_type.can_assign_to(parent_type) {
        Ok(())
    } else {
        Err(GraphError::InvalidAssignment {
            child: child.to_string(),
            child_type: child_type.to_string(),
            parent: parent.to_string(),
            parent_type: parent_type.to_string(),
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
