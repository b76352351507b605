//! Consolidation planning for one duplicate group.
//!
//! Planning is pure: given the locked member rows of a hash it decides which row survives,
//! which location rows the keeper ends up owning, which URLs link to which of those
//! locations, and which rows are deleted. The storage layer executes the plan inside a
//! single transaction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlanError;
use crate::job::{JobRecord, LocationTuple};

/// A URL to attach to one of the keeper's new location rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlLink {
    pub url: String,
    /// Index into [`ConsolidationPlan::locations`].
    pub location_index: usize,
    /// The member row the URL came from.
    pub source_job_id: Uuid,
}

/// A member URL that could not be attached to any location row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedUrl {
    pub url: String,
    pub source_job_id: Uuid,
}

/// Everything a group's transaction will write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationPlan {
    pub hash: String,
    pub keeper_id: Uuid,
    pub member_count: usize,
    /// Distinct location tuples across all members, in first-seen order.
    pub locations: Vec<LocationTuple>,
    /// Deduplicated by `(url, location_index)`.
    pub url_links: Vec<UrlLink>,
    /// Member URLs that matched no location tuple and will not be carried over.
    pub orphaned_urls: Vec<OrphanedUrl>,
    /// Every member except the keeper.
    pub losers: Vec<Uuid>,
}

impl ConsolidationPlan {
    /// Build the plan for `hash` from its member rows.
    ///
    /// The keeper is the member with the earliest `date_inserted`; equal timestamps fall back
    /// to the smallest id, so the outcome never depends on row order.
    pub fn build(hash: &str, members: &[JobRecord]) -> Result<Self, PlanError> {
        if let Some(foreign) = members.iter().find(|m| m.hash.as_deref() != Some(hash)) {
            return Err(PlanError::ForeignMember { id: foreign.id, expected: hash.to_owned() });
        }

        let mut ordered: Vec<&JobRecord> = members.iter().collect();
        ordered.sort_by(|a, b| a.date_inserted.cmp(&b.date_inserted).then(a.id.cmp(&b.id)));

        let keeper = *ordered.first().ok_or_else(|| PlanError::EmptyGroup(hash.to_owned()))?;

        let mut seen: HashSet<&LocationTuple> = HashSet::new();
        let mut locations: Vec<LocationTuple> = Vec::new();
        for member in &ordered {
            if seen.insert(&member.location) {
                locations.push(member.location.clone());
            }
        }

        let mut linked: HashSet<(&str, usize)> = HashSet::new();
        let mut url_links = Vec::new();
        let mut orphaned_urls = Vec::new();
        for member in &ordered {
            let Some(url) = member.url.as_deref() else {
                continue;
            };
            match match_location(&locations, &member.location) {
                Some(location_index) => {
                    if linked.insert((url, location_index)) {
                        url_links.push(UrlLink {
                            url: url.to_owned(),
                            location_index,
                            source_job_id: member.id,
                        });
                    }
                },
                None => {
                    tracing::warn!(
                        hash,
                        job_id = %member.id,
                        url,
                        "job URL matches no location tuple, dropping it"
                    );
                    orphaned_urls.push(OrphanedUrl { url: url.to_owned(), source_job_id: member.id });
                },
            }
        }

        let losers = ordered.iter().skip(1).map(|m| m.id).collect();

        Ok(Self {
            hash: hash.to_owned(),
            keeper_id: keeper.id,
            member_count: ordered.len(),
            locations,
            url_links,
            orphaned_urls,
            losers,
        })
    }
}

/// Resolve the location row a member's URL belongs to.
///
/// The member's own full tuple is preferred; it is always present because the distinct set
/// is built from the members. Failing that, the first tuple sharing the member's generated
/// city/state/country is used.
fn match_location(locations: &[LocationTuple], origin: &LocationTuple) -> Option<usize> {
    if let Some(exact) = locations.iter().position(|l| l == origin) {
        return Some(exact);
    }
    let place = origin.generated_place();
    locations.iter().position(|l| l.generated_place().matches(&place))
}

/// Outcome of a committed consolidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationReport {
    pub hash: String,
    pub keeper_id: Uuid,
    pub member_count: usize,
    pub locations_created: usize,
    pub urls_created: usize,
    pub jobs_deleted: u64,
}
