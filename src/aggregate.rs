//! Grouping of territory records into one aggregate per nation.
//!
//! Aggregation runs in two passes: the first sums areas, per-record centroids
//! and counts; the second divides the centroid sums by the record count. The
//! resulting centroid is a plain mean of record centroids and is not weighted
//! by area.

use std::collections::BTreeMap;

use crate::territory::TerritoryRecord;

/// Every nation in a snapshot, keyed (and therefore ordered) by name.
pub type Nations = BTreeMap<String, NationAggregate>;

#[derive(Debug, Clone, PartialEq)]
pub struct NationAggregate {
    pub total_area: f64,
    pub centroid_x: f64,
    pub centroid_z: f64,
    /// Always at least one.
    pub record_count: usize,
    pub collapsed: bool,
}

impl NationAggregate {
    pub fn centroid(&self) -> (f64, f64) {
        (self.centroid_x, self.centroid_z)
    }
}

/// First-pass accumulator; only turned into a `NationAggregate` once every
/// record has been seen.
#[derive(Default)]
struct Accumulator {
    total_area: f64,
    centroid_sum_x: f64,
    centroid_sum_z: f64,
    record_count: usize,
    collapsed: bool,
}

impl Accumulator {
    fn add(&mut self, record: &TerritoryRecord) {
        self.total_area += record.area();
        self.centroid_sum_x += record.centroid.0;
        self.centroid_sum_z += record.centroid.1;
        self.record_count += 1;
        self.collapsed |= record.collapsed;
    }

    fn finish(self) -> NationAggregate {
        let n = self.record_count as f64;
        NationAggregate {
            total_area: self.total_area,
            centroid_x: self.centroid_sum_x / n,
            centroid_z: self.centroid_sum_z / n,
            record_count: self.record_count,
            collapsed: self.collapsed,
        }
    }
}

pub fn aggregate(records: &[TerritoryRecord]) -> Nations {
    let mut sums: BTreeMap<String, Accumulator> = BTreeMap::new();
    for record in records {
        sums.entry(record.nation_name.clone())
            .or_default()
            .add(record);
    }

    sums.into_iter()
        .map(|(name, acc)| (name, acc.finish()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MARKER: &str = "崩壊";

    fn square(name: &str, x0: f64, z0: f64, side: f64, desc: &str) -> TerritoryRecord {
        TerritoryRecord::from_coords(
            name,
            &[x0, x0 + side, x0 + side, x0],
            &[z0, z0, z0 + side, z0 + side],
            desc,
            MARKER,
        )
    }

    #[test]
    fn one_aggregate_per_name() {
        let records = vec![
            square("A", 0.0, 0.0, 2.0, ""),
            square("B", 10.0, 0.0, 2.0, ""),
            square("A", 20.0, 0.0, 2.0, ""),
        ];
        let nations = aggregate(&records);
        assert_eq!(nations.len(), 2);
        assert_eq!(nations["A"].record_count, 2);
        assert_eq!(nations["B"].record_count, 1);
        assert_eq!(nations["A"].total_area, 8.0);
    }

    #[test]
    fn centroid_is_unweighted_mean_of_record_centroids() {
        // A tiny square around (0,0) and a big one around (10,0).
        let records = vec![
            square("A", -0.5, -0.5, 1.0, ""),
            square("A", 0.0, -10.0, 20.0, ""),
        ];
        let nations = aggregate(&records);
        let a = &nations["A"];
        assert_eq!(a.centroid(), (5.0, 0.0));
        assert_eq!(a.total_area, 401.0);
    }

    #[test]
    fn degenerate_records_still_count() {
        let records = vec![
            TerritoryRecord::from_coords("A", &[0.0, 10.0], &[0.0, 0.0], "", MARKER),
            TerritoryRecord::from_coords("A", &[], &[], "", MARKER),
            square("A", 0.0, 0.0, 3.0, ""),
        ];
        let a = &aggregate(&records)["A"];
        assert_eq!(a.record_count, 3);
        assert_eq!(a.total_area, 9.0);
    }

    #[test]
    fn any_collapsed_record_collapses_the_nation() {
        let records = vec![
            square("Alive", 0.0, 0.0, 1.0, "健在"),
            square("Alive", 5.0, 0.0, 1.0, ""),
            square("Fallen", 0.0, 5.0, 1.0, ""),
            square("Fallen", 5.0, 5.0, 1.0, "この国は崩壊しました"),
        ];
        let nations = aggregate(&records);
        assert!(!nations["Alive"].collapsed);
        assert!(nations["Fallen"].collapsed);
    }

    #[test]
    fn empty_input_yields_no_nations() {
        assert!(aggregate(&[]).is_empty());
    }

    fn records() -> impl Strategy<Value = Vec<TerritoryRecord>> {
        let one = (0usize..4, -500i32..500, -500i32..500, 1i32..50, any::<bool>()).prop_map(
            |(name, x, z, side, fallen)| {
                let desc = if fallen { MARKER } else { "" };
                square(&format!("N{name}"), x as f64, z as f64, side as f64, desc)
            },
        );
        prop::collection::vec(one, 1..20)
    }

    proptest! {
        #[test]
        fn order_does_not_matter(
            (recs, shuffled) in records()
                .prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle()))
        ) {
            let a = aggregate(&recs);
            let b = aggregate(&shuffled);
            prop_assert_eq!(a.len(), b.len());
            for (name, x) in &a {
                let y = &b[name];
                prop_assert_eq!(x.record_count, y.record_count);
                prop_assert_eq!(x.collapsed, y.collapsed);
                prop_assert!((x.total_area - y.total_area).abs() < 1e-6);
                prop_assert!((x.centroid_x - y.centroid_x).abs() < 1e-6);
                prop_assert!((x.centroid_z - y.centroid_z).abs() < 1e-6);
            }
        }
    }
}
