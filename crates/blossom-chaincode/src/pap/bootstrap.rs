//! # Base Graph
//!
//! Written once by `init_ngac`:
//!
//! ```text
//!   PC blossom
//!   ├── OA blossom_oa
//!   │   ├── O  blossom_target
//!   │   ├── OA licenses
//!   │   └── OA agencies
//!   ├── UA super_ua ◀── U <admin>          super_ua ──{*}──▶ blossom
//!   ├── UA agencies_ua
//!   └── UA approved_agencies_ua            approved_agencies_ua ──{view_license}──▶ licenses
//! ```

use blossom_core::{BlossomError, Operation, WILDCARD};
use blossom_ngac::{execute, Graph, NodeType, POLICY_CLASS_TARGET};

use super::{associate, create};

/// The Blossom policy class.
pub const BLOSSOM_PC: &str = "blossom";
/// Root object attribute under the policy class.
pub const BLOSSOM_OA: &str = "blossom_oa";
/// Object administrative rights are checked on.
pub const BLOSSOM_TARGET: &str = POLICY_CLASS_TARGET;
/// Container of every license attribute.
pub const LICENSES_OA: &str = "licenses";
/// Container of every agency attribute.
pub const AGENCIES_OA: &str = "agencies";
/// Administrators.
pub const SUPER_UA: &str = "super_ua";
/// Container of every agency user attribute.
pub const AGENCIES_UA: &str = "agencies_ua";
/// Agencies whose status is Approved.
pub const APPROVED_AGENCIES_UA: &str = "approved_agencies_ua";

/// The base graph with `admin` as the sole administrator.
pub fn base_graph(admin: &str) -> Result<Graph, BlossomError> {
    let mut graph = Graph::new();
    let commands = vec![
        create(BLOSSOM_PC, NodeType::PolicyClass, &[]),
        create(BLOSSOM_OA, NodeType::ObjectAttribute, &[BLOSSOM_PC]),
        create(BLOSSOM_TARGET, NodeType::Object, &[BLOSSOM_OA]),
        create(LICENSES_OA, NodeType::ObjectAttribute, &[BLOSSOM_OA]),
        create(AGENCIES_OA, NodeType::ObjectAttribute, &[BLOSSOM_OA]),
        create(SUPER_UA, NodeType::UserAttribute, &[BLOSSOM_PC]),
        create(admin, NodeType::User, &[SUPER_UA]),
        associate(SUPER_UA, BLOSSOM_PC, &[WILDCARD]),
        create(AGENCIES_UA, NodeType::UserAttribute, &[BLOSSOM_PC]),
        create(APPROVED_AGENCIES_UA, NodeType::UserAttribute, &[BLOSSOM_PC]),
        associate(APPROVED_AGENCIES_UA, LICENSES_OA, &[Operation::ViewLicense.as_str()]),
    ];
    execute(&mut graph, &commands)?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blossom_core::ALL_OPERATIONS;
    use blossom_ngac::Decider;

    #[test]
    fn admin_holds_everything_on_every_container() {
        let g = base_graph("admin:Org1MSP").unwrap();
        let d = Decider::new(&g);
        for target in [BLOSSOM_TARGET, LICENSES_OA, AGENCIES_OA, BLOSSOM_OA] {
            assert!(d.has_permissions("admin:Org1MSP", target, &ALL_OPERATIONS));
        }
    }

    #[test]
    fn approved_agencies_see_licenses_only() {
        let g = base_graph("admin:Org1MSP").unwrap();
        assert_eq!(
            g.association(APPROVED_AGENCIES_UA, LICENSES_OA)
                .map(|ops| ops.iter().cloned().collect::<Vec<_>>()),
            Some(vec!["view_license".to_string()])
        );
        assert!(g.association(AGENCIES_UA, LICENSES_OA).is_none());
    }

    #[test]
    fn base_graph_is_anchored() {
        base_graph("admin:Org1MSP").unwrap().validate().unwrap();
    }
}
