//! Proximity deduplication.
//!
//! Geocoders often return several records for one real place (a city node,
//! its boundary relation, a slightly different fix for the same name). These
//! are grouped by distance and collapsed to a single representative.

use super::types::{Candidate, Confidence};

// ─── Distance ───────────────────────────────────────────────────

/// Kilometres per degree of latitude.
const KM_PER_DEG_LAT: f64 = 111.0;
/// Kilometres per degree of longitude at mid latitudes.
const KM_PER_DEG_LON: f64 = 85.0;

/// Candidates closer than this are the same place.
pub const SIMILARITY_THRESHOLD_KM: f64 = 5.0;

/// Flat-earth distance in km. Good at city scale; not geodesic, and
/// increasingly wrong towards the poles.
pub fn approx_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dy = (lat1 - lat2) * KM_PER_DEG_LAT;
    let dx = (lon1 - lon2) * KM_PER_DEG_LON;
    (dy * dy + dx * dx).sqrt()
}

fn is_near(a: &Candidate, b: &Candidate) -> bool {
    approx_distance_km(a.latitude, a.longitude, b.latitude, b.longitude) < SIMILARITY_THRESHOLD_KM
}

// ─── Scoring ────────────────────────────────────────────────────

/// Score bonus per confidence tier.
pub const HIGH_CONFIDENCE_BONUS: f64 = 50.0;
pub const MEDIUM_CONFIDENCE_BONUS: f64 = 25.0;
pub const LOW_CONFIDENCE_BONUS: f64 = 0.0;

/// Penalty per character of `location_name`: shorter names are more canonical.
pub const NAME_LENGTH_PENALTY: f64 = 0.1;

/// Place categories ranked by how well they represent a searched place.
const TYPE_PRIORITY: &[(&str, f64)] = &[
    ("city", 100.0),
    ("town", 90.0),
    ("village", 80.0),
    ("neighbourhood", 70.0),
    ("suburb", 60.0),
    ("administrative", 50.0),
    ("county", 40.0),
    ("state", 30.0),
    ("country", 20.0),
];

pub fn type_priority(location_type: &str) -> f64 {
    TYPE_PRIORITY
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(location_type))
        .map(|(_, p)| *p)
        .unwrap_or(0.0)
}

pub fn confidence_bonus(confidence: Confidence) -> f64 {
    match confidence {
        Confidence::High => HIGH_CONFIDENCE_BONUS,
        Confidence::Medium => MEDIUM_CONFIDENCE_BONUS,
        Confidence::Low => LOW_CONFIDENCE_BONUS,
    }
}

/// Representative score: type priority + confidence bonus - name length penalty.
pub fn representative_score(c: &Candidate) -> f64 {
    type_priority(&c.location_type) + confidence_bonus(c.confidence)
        - NAME_LENGTH_PENALTY * c.location_name.chars().count() as f64
}

// ─── Grouping ───────────────────────────────────────────────────

/// Greedy single-link grouping in input order.
///
/// Each candidate joins the first existing group that has any member within
/// [`SIMILARITY_THRESHOLD_KM`], otherwise it starts a new group. Groups are
/// chain-connected: two members can be further apart than the threshold if
/// an intermediate member links them.
pub fn group_by_proximity(candidates: Vec<Candidate>) -> Vec<Vec<Candidate>> {
    let mut groups: Vec<Vec<Candidate>> = Vec::new();

    for candidate in candidates {
        match groups
            .iter_mut()
            .find(|g| g.iter().any(|m| is_near(m, &candidate)))
        {
            Some(group) => group.push(candidate),
            None => groups.push(vec![candidate]),
        }
    }

    groups
}

/// Pick the highest scoring member; earlier members win ties.
///
/// A group of two or more independent hits corroborates the place, so a
/// medium-confidence winner is promoted to high. Returns `None` for an empty
/// group.
pub fn select_representative(group: Vec<Candidate>) -> Option<Candidate> {
    let size = group.len();
    let mut best: Option<(Candidate, f64)> = None;

    for member in group {
        let score = representative_score(&member);
        match &best {
            Some((_, best_score)) if score <= *best_score => {}
            _ => best = Some((member, score)),
        }
    }

    best.map(|(mut winner, _)| {
        if size >= 2 && winner.confidence == Confidence::Medium {
            winner.confidence = Confidence::High;
        }
        winner
    })
}

/// Collapse candidates denoting the same place into one each.
pub fn deduplicate(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let before = candidates.len();
    let groups = group_by_proximity(candidates);
    let merged: Vec<Candidate> = groups.into_iter().filter_map(select_representative).collect();

    tracing::debug!(before, after = merged.len(), "deduplicated candidates");
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn at(name: &str, lat: f64, lon: f64, ty: &str, conf: Confidence) -> Candidate {
        Candidate {
            latitude: lat,
            longitude: lon,
            location_name: name.into(),
            short_name: name.into(),
            confidence: conf,
            location_type: ty.into(),
        }
    }

    #[test]
    fn test_approx_distance() {
        assert_relative_eq!(approx_distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_relative_eq!(approx_distance_km(1.0, 0.0, 0.0, 0.0), 111.0);
        assert_relative_eq!(approx_distance_km(0.0, 1.0, 0.0, 0.0), 85.0);
        assert_relative_eq!(approx_distance_km(0.0, 0.0, 0.03, 0.04), (3.33f64.powi(2) + 3.4f64.powi(2)).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_type_priority_table() {
        assert_relative_eq!(type_priority("city"), 100.0);
        assert_relative_eq!(type_priority("country"), 20.0);
        assert_relative_eq!(type_priority("peak"), 0.0);
        assert!(type_priority("town") > type_priority("village"));
    }

    #[test]
    fn test_type_priority_ignores_case() {
        assert_relative_eq!(type_priority("City"), 100.0);
        assert_relative_eq!(type_priority("NEIGHBOURHOOD"), 70.0);
    }

    #[test]
    fn test_representative_score() {
        let c = at("Brooklyn", 0.0, 0.0, "suburb", Confidence::Medium);
        // 60 + 25 - 0.1 * 8
        assert_relative_eq!(representative_score(&c), 84.2, epsilon = 1e-9);
    }

    #[test]
    fn test_nearby_records_grouped() {
        let groups = group_by_proximity(vec![
            at("A", 40.6782, -73.9442, "city", Confidence::Low),
            at("B", 40.6500, -73.9500, "city", Confidence::Low),
            at("C", 48.8566, 2.3522, "city", Confidence::Low),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1][0].location_name, "C");
    }

    #[test]
    fn test_chain_grouping_links_distant_members() {
        // A-B and B-C are ~4.4 km apart, A-C ~8.9 km: all three still merge.
        let groups = group_by_proximity(vec![
            at("A", 0.0, 0.0, "city", Confidence::Low),
            at("B", 0.04, 0.0, "city", Confidence::Low),
            at("C", 0.08, 0.0, "city", Confidence::Low),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn test_chain_depends_on_input_order() {
        // Without the bridge first, A and C start separate groups and B joins
        // only the first one it touches.
        let groups = group_by_proximity(vec![
            at("A", 0.0, 0.0, "city", Confidence::Low),
            at("C", 0.08, 0.0, "city", Confidence::Low),
            at("B", 0.04, 0.0, "city", Confidence::Low),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0][1].location_name, "B");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let lat = SIMILARITY_THRESHOLD_KM / KM_PER_DEG_LAT;
        let groups = group_by_proximity(vec![
            at("A", 0.0, 0.0, "city", Confidence::Low),
            at("B", lat * 1.001, 0.0, "city", Confidence::Low),
        ]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_representative_prefers_type_then_confidence() {
        let winner = select_representative(vec![
            at("Brooklyn Heights", 0.0, 0.0, "neighbourhood", Confidence::Medium),
            at("Brooklyn", 0.0, 0.0, "city", Confidence::Low),
        ])
        .unwrap();
        assert_eq!(winner.location_name, "Brooklyn");
        assert_eq!(winner.confidence, Confidence::Low);
    }

    #[test]
    fn test_ties_go_to_first() {
        let winner = select_representative(vec![
            at("Same", 1.0, 1.0, "town", Confidence::Low),
            at("Same", 1.01, 1.0, "town", Confidence::Low),
        ])
        .unwrap();
        assert_relative_eq!(winner.latitude, 1.0);
    }

    #[test]
    fn test_singleton_not_promoted() {
        let winner = select_representative(vec![at("Solo", 0.0, 0.0, "town", Confidence::Medium)]).unwrap();
        assert_eq!(winner.confidence, Confidence::Medium);
        assert!(select_representative(Vec::new()).is_none());
    }

    #[test]
    fn test_brooklyn_group_promoted_to_high() {
        let merged = deduplicate(vec![
            at("Brooklyn, Kings County, New York, United States", 40.6526, -73.9497, "suburb", Confidence::Medium),
            at("Brooklyn, New York, United States", 40.6782, -73.9442, "suburb", Confidence::Medium),
            at("Brooklyn Bridge Park, Brooklyn, New York, United States", 40.6700, -73.9600, "park", Confidence::Low),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].location_name, "Brooklyn, New York, United States");
        assert_eq!(merged[0].confidence, Confidence::High);
    }

    #[test]
    fn test_low_winner_not_promoted() {
        let merged = deduplicate(vec![
            at("X", 0.0, 0.0, "peak", Confidence::Low),
            at("Y", 0.0, 0.001, "peak", Confidence::Low),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, Confidence::Low);
    }

    // Well-separated groups with no chaining. Chained input is not stable
    // across passes, see test_chained_output_merges_on_second_pass.
    #[test]
    fn test_deduplicate_idempotent_without_chaining() {
        let once = deduplicate(vec![
            at("Springfield, Illinois", 39.7990, -89.6440, "city", Confidence::Medium),
            at("Springfield, Sangamon County", 39.8017, -89.6437, "administrative", Confidence::Low),
            at("Springfield, Massachusetts", 42.1015, -72.5898, "city", Confidence::Medium),
            at("Springfield, Missouri", 37.2090, -93.2923, "city", Confidence::Medium),
        ]);
        assert_eq!(once.len(), 3);
        let twice = deduplicate(once.clone());
        assert_eq!(once, twice);
    }

    // Holds only when no member bridges two groups; see
    // test_chain_depends_on_input_order for a counterexample.
    #[test]
    fn test_nearby_pairs_share_group_without_chaining() {
        let input = vec![
            at("P1", 10.0, 10.0, "city", Confidence::Low),
            at("P2", 30.0, 30.0, "city", Confidence::Low),
            at("P3", 10.02, 10.02, "city", Confidence::Low),
            at("P4", 30.03, 29.99, "city", Confidence::Low),
            at("P5", 50.0, 50.0, "city", Confidence::Low),
        ];
        let groups = group_by_proximity(input.clone());
        let group_of = |name: &str| {
            groups
                .iter()
                .position(|g| g.iter().any(|m| m.location_name == name))
                .unwrap()
        };
        for a in &input {
            for b in &input {
                if is_near(a, b) {
                    assert_eq!(group_of(&a.location_name), group_of(&b.location_name));
                }
            }
        }
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_chained_output_merges_on_second_pass() {
        // The short-named bridge wins its group, and its position lands
        // within range of the group that was kept apart on the first pass.
        let once = deduplicate(vec![
            at("AAAA", 0.0, 0.0, "city", Confidence::Low),
            at("BBBBBBBBBB", 0.054, 0.0, "city", Confidence::Low),
            at("A", 0.027, 0.0, "city", Confidence::Low),
        ]);
        let names: Vec<_> = once.iter().map(|c| c.location_name.as_str()).collect();
        assert_eq!(names, ["A", "BBBBBBBBBB"]);

        let twice = deduplicate(once);
        assert_eq!(twice.len(), 1);
        assert_eq!(twice[0].location_name, "A");
    }
}
