//! # Transaction Context
//!
//! What a contract operation sees: the verified caller, the transaction
//! timestamp, and the open ledger transaction.

use blossom_core::{BlossomError, Timestamp};
use blossom_ledger::{get_record, put_record, ClientIdentity, KvStore, GRAPH_KEY};
use blossom_ngac::{Graph, GraphDocument};

/// Per-request context.
pub struct TxContext<'s> {
    store: &'s mut dyn KvStore,
    client: ClientIdentity,
    now: Timestamp,
}

impl<'s> TxContext<'s> {
    /// Context for `client` over `store` at `now`.
    pub fn new(store: &'s mut dyn KvStore, client: ClientIdentity, now: Timestamp) -> Self {
        Self { store, client, now }
    }

    /// The caller.
    pub fn client(&self) -> &ClientIdentity {
        &self.client
    }

    /// The caller's user node name.
    pub fn user(&self) -> String {
        self.client.subject()
    }

    /// Transaction timestamp.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// The open transaction.
    pub fn store(&mut self) -> &mut (dyn KvStore + 's) {
        &mut *self.store
    }

    /// Whether a policy graph has been written.
    pub fn has_graph(&mut self) -> Result<bool, BlossomError> {
        Ok(self.store.get(GRAPH_KEY)?.is_some())
    }

    /// Read the policy graph.
    pub fn load_graph(&mut self) -> Result<Graph, BlossomError> {
        let doc: GraphDocument = get_record(&mut *self.store, GRAPH_KEY)?
            .ok_or_else(|| BlossomError::NotFound("policy graph (run init_ngac first)".into()))?;
        Ok(Graph::from_document(doc)?)
    }

    /// Write the policy graph back.
    pub fn save_graph(&mut self, graph: &Graph) -> Result<(), BlossomError> {
        put_record(&mut *self.store, GRAPH_KEY, &graph.to_document())
    }
}

impl std::fmt::Debug for TxContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxContext")
            .field("client", &self.client)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}
