//! Location resolution and disambiguation.
//!
//! Turns free-text place queries into geocoded candidates: raw geocoder hits
//! are classified, labelled, filtered for relevance, merged by proximity and
//! cut down to the best confidence tier.

pub mod confidence;
pub mod dedup;
pub mod provider;
pub mod relevance;
pub mod resolver;
pub mod short_name;
pub mod tier;
pub mod types;

pub use provider::{GeocodeProvider, NominatimProvider};
pub use resolver::{LocationResolver, DEFAULT_LIMIT};
pub use types::{Candidate, Confidence, DefaultLocation, DisambiguationResult, LocationError, RawCandidate};
