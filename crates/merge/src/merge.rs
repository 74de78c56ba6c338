use crate::StreamRecord;
use std::collections::HashMap;
use tracing::instrument;

/// A single change to apply against a destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Append a record that the destination has never seen.
    Insert(StreamRecord),
    /// Set the display name of every destination row matching `link`.
    Update { link: String, name: String },
}

/// Ordered list of operations produced by [`merge`].
///
/// Operations must be applied in order; identifiers for inserts were assigned
/// in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    operations: Vec<Operation>,
}
impl MergePlan {
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn inserts(&self) -> impl Iterator<Item = &StreamRecord> {
        self.operations.iter().filter_map(|op| match op {
            Operation::Insert(record) => Some(record),
            Operation::Update { .. } => None,
        })
    }

    pub fn updates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.operations.iter().filter_map(|op| match op {
            Operation::Update { link, name } => Some((link.as_str(), name.as_str())),
            Operation::Insert(_) => None,
        })
    }

    /// Apply the plan to an in-memory copy of the destination table.
    ///
    /// Mirrors what the store does in SQL, which makes it handy for checking
    /// a plan without a database.
    pub fn apply_to(&self, destination: &mut Vec<StreamRecord>) {
        for op in &self.operations {
            match op {
                Operation::Insert(record) => destination.push(record.clone()),
                Operation::Update { link, name } => destination
                    .iter_mut()
                    .filter(|record| &record.link == link)
                    .for_each(|record| record.name.clone_from(name)),
            }
        }
    }
}

/// Reconcile a freshly scraped snapshot into a destination table.
///
/// See the [crate-level documentation](crate) for the rules. Links that only
/// exist in the destination are left untouched. If the destination is empty,
/// new identifiers start at 1.
///
/// When a link appears more than once in the source, the name of its last
/// occurrence wins and the link keeps the position of its first occurrence.
#[instrument(level = "debug", skip_all, fields(source = source.len(), destination = destination.len()))]
pub fn merge(source: &[StreamRecord], destination: &[StreamRecord]) -> MergePlan {
    let source = by_link(source);
    let known: HashMap<&str, &str> =
        destination.iter().map(|record| (record.link.as_str(), record.name.as_str())).collect();
    let mut next_id = destination.iter().map(|record| record.id).max().map_or(1, |max| max + 1);

    let mut operations = Vec::new();
    for (link, name) in source {
        match known.get(link) {
            Some(existing) if *existing == name => {},
            Some(_) => operations.push(Operation::Update { link: link.to_string(), name: name.to_string() }),
            None => {
                operations.push(Operation::Insert(StreamRecord::new(next_id, name, link)));
                next_id += 1;
            },
        }
    }
    MergePlan { operations }
}

fn by_link(records: &[StreamRecord]) -> Vec<(&str, &str)> {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut ordered: Vec<(&str, &str)> = Vec::with_capacity(records.len());
    for record in records {
        match positions.get(record.link.as_str()) {
            Some(&position) => {
                tracing::warn!(link = %record.link, name = %record.name, "Duplicate link in snapshot; last name wins");
                ordered[position].1 = record.name.as_str();
            },
            None => {
                positions.insert(record.link.as_str(), ordered.len());
                ordered.push((record.link.as_str(), record.name.as_str()));
            },
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::collections::HashSet;

    fn record(id: u64, name: &str, link: &str) -> StreamRecord {
        StreamRecord::new(id, name, link)
    }

    fn merged(source: &[StreamRecord], destination: &[StreamRecord]) -> Vec<StreamRecord> {
        let mut result = destination.to_vec();
        merge(source, destination).apply_to(&mut result);
        result
    }

    #[fixture]
    fn destination() -> Vec<StreamRecord> {
        vec![record(1, "Rock FM", "http://a"), record(2, "Jazz24", "http://b")]
    }

    #[fixture]
    fn source() -> Vec<StreamRecord> {
        vec![record(1, "Rock Radio", "http://a"), record(2, "Indie Wave", "http://c")]
    }

    #[rstest]
    fn test_example_scenario(source: Vec<StreamRecord>, destination: Vec<StreamRecord>) {
        let plan = merge(&source, &destination);
        assert_eq!(
            plan.operations(),
            &[
                Operation::Update { link: "http://a".to_string(), name: "Rock Radio".to_string() },
                Operation::Insert(record(3, "Indie Wave", "http://c")),
            ]
        );
        assert_eq!(
            merged(&source, &destination),
            vec![
                record(1, "Rock Radio", "http://a"),
                record(2, "Jazz24", "http://b"),
                record(3, "Indie Wave", "http://c"),
            ]
        );
    }

    #[rstest]
    fn test_idempotent(source: Vec<StreamRecord>, destination: Vec<StreamRecord>) {
        let once = merged(&source, &destination);
        assert!(merge(&source, &once).is_empty());
        assert_eq!(merged(&source, &once), once);
    }

    #[rstest]
    fn test_deterministic(source: Vec<StreamRecord>, destination: Vec<StreamRecord>) {
        assert_eq!(merge(&source, &destination), merge(&source, &destination));
    }

    #[rstest]
    fn test_empty_source_is_noop(destination: Vec<StreamRecord>) {
        assert!(merge(&[], &destination).is_empty());
        assert_eq!(merged(&[], &destination), destination);
    }

    #[rstest]
    fn test_never_deletes(destination: Vec<StreamRecord>) {
        let source = vec![record(1, "Something Else", "http://z")];
        let result = merged(&source, &destination);
        for kept in &destination {
            assert!(result.contains(kept), "{kept} should survive the merge");
        }
    }

    #[rstest]
    fn test_inserts_get_fresh_distinct_ids() {
        let destination = vec![record(4, "A", "http://a"), record(9, "B", "http://b"), record(2, "C", "http://c")];
        let source: Vec<_> = (0..5).map(|i| record(i + 1, "New", &format!("http://new/{i}"))).collect();
        let plan = merge(&source, &destination);
        let ids: Vec<u64> = plan.inserts().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13, 14]);
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    }

    #[rstest]
    fn test_update_keeps_identifier(destination: Vec<StreamRecord>) {
        let source = vec![record(99, "Jazz 24/7", "http://b")];
        let result = merged(&source, &destination);
        assert_eq!(result[1], record(2, "Jazz 24/7", "http://b"));
        assert_eq!(merge(&source, &destination).inserts().count(), 0);
    }

    #[rstest]
    #[case("rock fm")]
    #[case("Rock FM ")]
    #[case(" Rock FM")]
    fn test_names_compared_exactly(destination: Vec<StreamRecord>, #[case] name: &str) {
        let plan = merge(&[record(1, name, "http://a")], &destination);
        assert_eq!(plan.updates().collect::<Vec<_>>(), vec![("http://a", name)]);
    }

    #[test]
    fn test_empty_destination_starts_at_one() {
        let source = vec![record(7, "A", "http://a"), record(8, "B", "http://b")];
        let plan = merge(&source, &[]);
        assert_eq!(plan.inserts().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[rstest]
    fn test_duplicate_source_link_last_name_wins(destination: Vec<StreamRecord>) {
        let source = vec![
            record(1, "First", "http://c"),
            record(2, "Rock FM", "http://a"),
            record(3, "Second", "http://c"),
        ];
        let plan = merge(&source, &destination);
        assert_eq!(plan.operations(), &[Operation::Insert(record(3, "Second", "http://c"))]);
    }

    #[test]
    fn test_apply_updates_every_matching_row() {
        let mut destination = vec![record(1, "Old", "http://a"), record(2, "Older", "http://a")];
        let plan = merge(&[record(1, "New", "http://a")], &destination);
        plan.apply_to(&mut destination);
        assert!(destination.iter().all(|r| r.name == "New"));
    }
}
