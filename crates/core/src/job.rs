use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The LLM-generated place a job was resolved to.
///
/// Comparison treats `None` and the empty string as the same value, matching how the
/// store coalesces NULL columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedPlace {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl GeneratedPlace {
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        fn norm(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("")
        }
        norm(&self.city) == norm(&other.city)
            && norm(&self.state) == norm(&other.state)
            && norm(&self.country) == norm(&other.country)
    }
}

/// Every location attribute carried by a job row, copied verbatim into `job_locations`.
///
/// `latitude` and `longitude` hold the exact textual rendering of the `numeric` columns so
/// equality and re-insertion never go through floating point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationTuple {
    pub generated_city: Option<String>,
    pub generated_state: Option<String>,
    pub generated_country: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub locality: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub llm_location_retry_count: Option<i32>,
}

impl LocationTuple {
    #[must_use]
    pub fn generated_place(&self) -> GeneratedPlace {
        GeneratedPlace {
            city: self.generated_city.clone(),
            state: self.generated_state.clone(),
            country: self.generated_country.clone(),
        }
    }
}

/// One row of `jobs`, reduced to the columns consolidation reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub hash: Option<String>,
    pub date_inserted: DateTime<Utc>,
    pub url: Option<String>,
    pub location: LocationTuple,
}

/// A content hash shared by more than one job row, as reported by the duplicate finder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateHash {
    pub hash: String,
    pub count: u64,
}

impl DuplicateHash {
    #[must_use]
    pub fn new(hash: impl Into<String>, count: u64) -> Self {
        Self { hash: hash.into(), count }
    }
}
