//! Agency operations.

use blossom_core::BlossomError;
use blossom_ledger::{agency_key, put_record, scan_records, AGENCY_PREFIX};
use blossom_state::{Agency, AgencyStatus, Users};

use super::graph::node_clash_as_exists;
use super::{load_agency, require_non_empty, Blossom};
use crate::context::TxContext;
use crate::pap::agency as agency_pap;
use crate::pdp::agency as agency_pdp;

impl Blossom {
    /// Request an account for a new agency. Any caller may request one; the
    /// agency starts pending approval, without an ATO and without keys.
    pub fn request_account(
        &self,
        ctx: &mut TxContext<'_>,
        name: &str,
        mspid: &str,
        users: Users,
    ) -> Result<(), BlossomError> {
        require_non_empty("agency name", name)?;
        require_non_empty("agency mspid", mspid)?;
        require_non_empty("system owner", &users.system_owner)?;
        require_non_empty("acquisition specialist", &users.acquisition_specialist)?;
        require_non_empty("system administrator", &users.system_administrator)?;

        let key = agency_key(name);
        if ctx.store().get(&key)?.is_some() {
            return Err(BlossomError::AlreadyExists(format!("agency {name}")));
        }

        let agency = Agency::request(name, mspid, users);
        let mut graph = ctx.load_graph()?;
        agency_pap::request_account(&mut graph, &agency)
            .map_err(|e| node_clash_as_exists(e, format!("agency {name} in the policy graph")))?;

        ctx.save_graph(&graph)?;
        put_record(ctx.store(), &key, &agency)
    }

    /// Set the agency's status. Approval grants its members `view_license`
    /// on every license; any other status withdraws it.
    pub fn update_agency_status(
        &self,
        ctx: &mut TxContext<'_>,
        name: &str,
        status: AgencyStatus,
    ) -> Result<(), BlossomError> {
        let mut agency = load_agency(ctx, name)?;
        let mut graph = ctx.load_graph()?;
        agency_pdp::authorize_update_status(&graph, &ctx.user(), name)?;

        agency.status = Some(status);
        agency_pap::set_approved(&mut graph, name, status.is_approved())?;

        ctx.save_graph(&graph)?;
        put_record(ctx.store(), &agency_key(name), &agency)
    }

    /// Record the agency's authority to operate document.
    pub fn upload_ato(&self, ctx: &mut TxContext<'_>, name: &str, ato: &str) -> Result<(), BlossomError> {
        let mut agency = load_agency(ctx, name)?;
        let graph = ctx.load_graph()?;
        agency_pdp::authorize_upload_ato(&graph, &ctx.user(), name)?;

        agency.ato = ato.to_string();
        put_record(ctx.store(), &agency_key(name), &agency)
    }

    /// Every agency the caller can view, filtered.
    pub fn agencies(&self, ctx: &mut TxContext<'_>) -> Result<Vec<Agency>, BlossomError> {
        let graph = ctx.load_graph()?;
        let all: Vec<Agency> = scan_records(ctx.store(), AGENCY_PREFIX)?;
        Ok(agency_pdp::filter_agencies(&graph, &ctx.user(), all))
    }

    /// One agency, filtered to what the caller can view.
    pub fn agency(&self, ctx: &mut TxContext<'_>, name: &str) -> Result<Agency, BlossomError> {
        let graph = ctx.load_graph()?;
        let mut agency = load_agency(ctx, name)?;
        agency_pdp::filter_agency(&graph, &ctx.user(), &mut agency);
        Ok(agency)
    }
}
