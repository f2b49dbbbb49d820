//! SwID operations.

use blossom_core::BlossomError;
use blossom_ledger::{get_record, put_record, scan_records, swid_key, SWID_PREFIX};
use blossom_state::SwId;

use super::graph::node_clash_as_exists;
use super::{load_agency, Blossom};
use crate::context::TxContext;
use crate::pap::swid as swid_pap;
use crate::pdp::swid as swid_pdp;

impl Blossom {
    /// Report a software tag for an installation using key `swid.license`
    /// of license `swid.asset`, held by `agency`.
    ///
    /// A duplicate `primary_tag` is reported as `AlreadyExists` before the
    /// caller is authorized, so any caller can tell whether a tag exists.
    pub fn report_swid(&self, ctx: &mut TxContext<'_>, mut swid: SwId, agency: &str) -> Result<(), BlossomError> {
        swid.agency = agency.to_string();
        swid.validate()?;

        let key = swid_key(&swid.primary_tag);
        if ctx.store().get(&key)?.is_some() {
            return Err(BlossomError::AlreadyExists(format!("swid {}", swid.primary_tag)));
        }

        let mut graph = ctx.load_graph()?;
        swid_pdp::authorize_report(&graph, &ctx.user(), agency)?;

        let holder = load_agency(ctx, agency)?;
        if !holder.holds_key(&swid.asset, &swid.license) {
            return Err(BlossomError::NotFound(format!(
                "key {} of license {} checked out by agency {agency}",
                swid.license, swid.asset
            )));
        }

        swid_pap::report(&mut graph, &swid.primary_tag, agency)
            .map_err(|e| node_clash_as_exists(e, format!("swid {} in the policy graph", swid.primary_tag)))?;

        ctx.save_graph(&graph)?;
        put_record(ctx.store(), &key, &swid)
    }

    /// One tag, filtered to what the caller can view.
    pub fn swid(&self, ctx: &mut TxContext<'_>, primary_tag: &str) -> Result<SwId, BlossomError> {
        let graph = ctx.load_graph()?;
        let mut swid: SwId = get_record(ctx.store(), &swid_key(primary_tag))?
            .ok_or_else(|| BlossomError::NotFound(format!("swid {primary_tag}")))?;
        swid_pdp::filter_swid(&graph, &ctx.user(), &mut swid);
        Ok(swid)
    }

    /// Every tag reported against license `asset` that the caller can view.
    pub fn swids_for_license(&self, ctx: &mut TxContext<'_>, asset: &str) -> Result<Vec<SwId>, BlossomError> {
        let graph = ctx.load_graph()?;
        let all: Vec<SwId> = scan_records(ctx.store(), SWID_PREFIX)?;
        let matching = all.into_iter().filter(|s| s.asset == asset).collect();
        Ok(swid_pdp::filter_swids(&graph, &ctx.user(), matching))
    }
}
