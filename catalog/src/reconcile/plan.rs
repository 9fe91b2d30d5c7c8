use std::collections::HashSet;

/// The set of changes that brings the products table in line with the catalog file.
///
/// Each sku appears at most once across the three lists. Additions and updates follow
/// catalog order, deletions follow the order in which persisted skus were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_add: Vec<String>,
    pub to_delete: Vec<String>,
    pub to_update: Vec<String>,
}

impl SyncPlan {
    /// Diffs candidate skus against persisted skus.
    ///
    /// Repeated skus on either side are collapsed onto their first occurrence.
    pub fn new<'a, C, P>(candidate_skus: C, persisted_skus: P) -> SyncPlan
    where
        C: IntoIterator<Item = &'a str>,
        P: IntoIterator<Item = &'a str>,
    {
        let candidates = first_occurrences(candidate_skus);
        let persisted = first_occurrences(persisted_skus);

        let candidate_set: HashSet<&str> = candidates.iter().copied().collect();
        let persisted_set: HashSet<&str> = persisted.iter().copied().collect();

        let mut plan = SyncPlan::default();
        for sku in &candidates {
            if persisted_set.contains(sku) {
                plan.to_update.push((*sku).to_owned());
            } else {
                plan.to_add.push((*sku).to_owned());
            }
        }
        plan.to_delete = persisted
            .into_iter()
            .filter(|sku| !candidate_set.contains(sku))
            .map(str::to_owned)
            .collect();

        plan
    }

    /// Total number of writes the plan will issue.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_delete.len() + self.to_update.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn first_occurrences<'a>(skus: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    skus.into_iter().filter(|sku| seen.insert(*sku)).collect()
}
