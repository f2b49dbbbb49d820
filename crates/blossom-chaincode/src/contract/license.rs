//! License operations.

use blossom_core::BlossomError;
use blossom_ledger::{agency_key, delete_record, license_key, put_record, scan_records, LICENSE_PREFIX};
use blossom_state::{self as state, CheckedOutKeys, License};

use super::graph::node_clash_as_exists;
use super::{load_agency, load_license, require_non_empty, Blossom};
use crate::context::TxContext;
use crate::pap::license as license_pap;
use crate::pdp::license as license_pdp;

impl Blossom {
    /// Add a license with `keys`, all available.
    pub fn onboard_license(
        &self,
        ctx: &mut TxContext<'_>,
        id: &str,
        name: &str,
        keys: Vec<String>,
    ) -> Result<(), BlossomError> {
        require_non_empty("license id", id)?;
        let key = license_key(id);
        if ctx.store().get(&key)?.is_some() {
            return Err(BlossomError::AlreadyExists(format!("license {id}")));
        }

        let mut graph = ctx.load_graph()?;
        license_pdp::authorize_onboard(&graph, &ctx.user())?;
        let license = License::onboard(id, name, keys, ctx.now())?;
        license_pap::onboard(&mut graph, id, &license.all_keys)
            .map_err(|e| node_clash_as_exists(e, format!("license {id} in the policy graph")))?;

        ctx.save_graph(&graph)?;
        put_record(ctx.store(), &key, &license)
    }

    /// Remove a license record. Offboarding an unknown license does nothing.
    ///
    /// The ledger lookup happens before authorization, so any caller can
    /// tell whether a license id exists from the outcome.
    pub fn offboard_license(&self, ctx: &mut TxContext<'_>, id: &str) -> Result<(), BlossomError> {
        let key = license_key(id);
        if ctx.store().get(&key)?.is_none() {
            tracing::info!(license = id, "license not on the ledger, nothing to offboard");
            return Ok(());
        }
        let graph = ctx.load_graph()?;
        license_pdp::authorize_offboard(&graph, &ctx.user(), id)?;
        delete_record(ctx.store(), &key)
    }

    /// Every license the caller can view, filtered.
    pub fn licenses(&self, ctx: &mut TxContext<'_>) -> Result<Vec<License>, BlossomError> {
        let graph = ctx.load_graph()?;
        let all: Vec<License> = scan_records(ctx.store(), LICENSE_PREFIX)?;
        Ok(license_pdp::filter_licenses(&graph, &ctx.user(), all))
    }

    /// One license, filtered to what the caller can view.
    pub fn license_info(&self, ctx: &mut TxContext<'_>, id: &str) -> Result<License, BlossomError> {
        let graph = ctx.load_graph()?;
        let mut license = load_license(ctx, id)?;
        license_pdp::filter_license(&graph, &ctx.user(), &mut license);
        Ok(license)
    }

    /// Check out `amount` keys of license `id` for `agency`. Returns the
    /// keys with their expirations.
    pub fn checkout_license(
        &self,
        ctx: &mut TxContext<'_>,
        id: &str,
        agency: &str,
        amount: usize,
    ) -> Result<CheckedOutKeys, BlossomError> {
        let mut agency_rec = load_agency(ctx, agency)?;
        let mut license = load_license(ctx, id)?;
        let mut graph = ctx.load_graph()?;
        license_pdp::authorize_checkout(&graph, &ctx.user(), id, agency)?;

        let taken = state::checkout(&mut license, &mut agency_rec, amount, ctx.now())?;
        license_pap::checkout(&mut graph, id, agency, taken.keys())?;

        ctx.save_graph(&graph)?;
        put_record(ctx.store(), &agency_key(agency), &agency_rec)?;
        put_record(ctx.store(), &license_key(id), &license)?;
        Ok(taken)
    }

    /// Return `keys` of license `id` from `agency`.
    pub fn checkin_license(
        &self,
        ctx: &mut TxContext<'_>,
        id: &str,
        keys: &[String],
        agency: &str,
    ) -> Result<(), BlossomError> {
        let mut agency_rec = load_agency(ctx, agency)?;
        let mut license = load_license(ctx, id)?;
        let mut graph = ctx.load_graph()?;
        license_pdp::authorize_checkin(&graph, &ctx.user(), agency)?;

        state::checkin(&mut license, &mut agency_rec, keys)?;
        license_pap::checkin(&mut graph, id, agency, keys)?;

        ctx.save_graph(&graph)?;
        put_record(ctx.store(), &agency_key(agency), &agency_rec)?;
        put_record(ctx.store(), &license_key(id), &license)
    }
}
