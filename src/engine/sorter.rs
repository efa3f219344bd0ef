use crate::domain::{Record, SortKey};

/// One batch of records with its three orderings
///
/// Holds the records in arrival order plus one index permutation per sort
/// key, so the batch is sorted three ways without cloning any record.
#[derive(Debug, Clone, Default)]
pub struct SortedBatch {
    records: Vec<Record>,
    by_id: Vec<usize>,
    by_name: Vec<usize>,
    by_price: Vec<usize>,
}

impl SortedBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order given by `key`
    pub fn ordered(&self, key: SortKey) -> impl Iterator<Item = &Record> + '_ {
        let order = match key {
            SortKey::Id => &self.by_id,
            SortKey::Name => &self.by_name,
            SortKey::Price => &self.by_price,
        };
        order.iter().map(|&i| &self.records[i])
    }

    pub fn by_id(&self) -> impl Iterator<Item = &Record> + '_ {
        self.ordered(SortKey::Id)
    }

    pub fn by_name(&self) -> impl Iterator<Item = &Record> + '_ {
        self.ordered(SortKey::Name)
    }

    pub fn by_price(&self) -> impl Iterator<Item = &Record> + '_ {
        self.ordered(SortKey::Price)
    }

    /// Hand back the records in arrival order, e.g. to reuse the allocation
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Sort one batch three ways: by id, by name (ordinal), by price (numeric)
///
/// Every ordering is ascending and stable, so records with equal keys keep
/// their arrival order. Pure and allocation-only; safe to run on a blocking
/// thread.
pub fn sort_batch(records: Vec<Record>) -> SortedBatch {
    let arrival: Vec<usize> = (0..records.len()).collect();

    let mut by_id = arrival.clone();
    by_id.sort_by_key(|&i| records[i].id);

    let mut by_name = arrival.clone();
    by_name.sort_by(|&a, &b| records[a].name.as_bytes().cmp(records[b].name.as_bytes()));

    let mut by_price = arrival;
    by_price.sort_by(|&a, &b| records[a].price.cmp_value(&records[b].price));

    SortedBatch {
        records,
        by_id,
        by_name,
        by_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Price;
    use proptest::prelude::*;

    fn record(id: i64, name: &str, price: &str) -> Record {
        Record::new(id, name, Price::parse(price).unwrap())
    }

    fn lines<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<String> {
        records.map(ToString::to_string).collect()
    }

    #[test]
    fn sorts_three_ways() {
        let batch = sort_batch(vec![
            record(1, "Widget", "9.99"),
            record(2, "Apple", "3.50"),
            record(3, "Banana", "1.25"),
        ]);

        assert_eq!(
            lines(batch.by_id()),
            ["1,Widget,9.99", "2,Apple,3.50", "3,Banana,1.25"]
        );
        assert_eq!(
            lines(batch.by_name()),
            ["2,Apple,3.50", "3,Banana,1.25", "1,Widget,9.99"]
        );
        assert_eq!(
            lines(batch.by_price()),
            ["3,Banana,1.25", "2,Apple,3.50", "1,Widget,9.99"]
        );
    }

    #[test]
    fn empty_batch_yields_empty_orderings() {
        let batch = sort_batch(Vec::new());

        assert!(batch.is_empty());
        assert_eq!(batch.by_id().count(), 0);
        assert_eq!(batch.by_name().count(), 0);
        assert_eq!(batch.by_price().count(), 0);
    }

    #[test]
    fn name_ordering_is_ordinal() {
        let batch = sort_batch(vec![
            record(1, "apple", "1"),
            record(2, "Banana", "1"),
            record(3, "Apple", "1"),
        ]);

        // Uppercase sorts before lowercase under ordinal comparison.
        let ids: Vec<i64> = batch.by_name().map(|r| r.id).collect();
        assert_eq!(ids, [3, 2, 1]);
    }

    #[test]
    fn price_ordering_is_numeric_not_textual() {
        let batch = sort_batch(vec![
            record(1, "A", "10.00"),
            record(2, "B", "9.5"),
            record(3, "C", "100"),
        ]);

        let ids: Vec<i64> = batch.by_price().map(|r| r.id).collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[test]
    fn equal_keys_keep_arrival_order() {
        let batch = sort_batch(vec![
            record(5, "Same", "2.0"),
            record(1, "Same", "2.00"),
            record(5, "Other", "1"),
        ]);

        let by_id: Vec<&str> = batch.by_id().map(|r| r.name.as_str()).collect();
        assert_eq!(by_id, ["Same", "Same", "Other"]);

        let by_name: Vec<i64> = batch.by_name().map(|r| r.id).collect();
        assert_eq!(by_name, [5, 5, 1]);

        let by_price: Vec<String> = batch.by_price().map(|r| r.price.to_string()).collect();
        assert_eq!(by_price, ["1", "2.0", "2.00"]);
    }

    #[test]
    fn into_records_preserves_arrival_order() {
        let batch = sort_batch(vec![record(2, "B", "1"), record(1, "A", "1")]);
        let ids: Vec<i64> = batch.into_records().iter().map(|r| r.id).collect();
        assert_eq!(ids, [2, 1]);
    }

    fn arb_record() -> impl Strategy<Value = Record> {
        (-50i64..50, "[a-cA-C]{0,3}", 0u64..500, 0u8..3).prop_map(|(id, name, raw, scale)| {
            Record::new(id, name, Price::from_raw(raw * 10_000, scale))
        })
    }

    proptest! {
        #[test]
        fn every_ordering_is_sorted_and_stable(records in prop::collection::vec(arb_record(), 0..64)) {
            let positions: Vec<(usize, Record)> = records.iter().cloned().enumerate().collect();
            let batch = sort_batch(records);

            for key in SortKey::ALL {
                let ordered: Vec<&Record> = batch.ordered(key).collect();
                prop_assert_eq!(ordered.len(), positions.len());

                // Recover arrival indexes to check stability.
                let mut taken = vec![false; positions.len()];
                let mut arrival = Vec::with_capacity(ordered.len());
                for r in &ordered {
                    let idx = positions
                        .iter()
                        .position(|(i, p)| !taken[*i] && p == *r)
                        .unwrap();
                    taken[idx] = true;
                    arrival.push(idx);
                }

                for (pair, idx) in ordered.windows(2).zip(arrival.windows(2)) {
                    let ord = match key {
                        SortKey::Id => pair[0].id.cmp(&pair[1].id),
                        SortKey::Name => pair[0].name.as_bytes().cmp(pair[1].name.as_bytes()),
                        SortKey::Price => pair[0].price.cmp_value(&pair[1].price),
                    };
                    prop_assert!(ord.is_le());
                    if ord.is_eq() {
                        prop_assert!(idx[0] < idx[1]);
                    }
                }
            }
        }
    }
}
