use std::collections::BTreeSet;

/// Elements present in exactly one of the two sets. Neither input is modified.
pub fn symmetric_difference<T>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T>
where
    T: Ord + Clone,
{
    a.symmetric_difference(b).cloned().collect()
}

pub fn sets_differ<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> bool {
    a.symmetric_difference(b).next().is_some()
}

#[cfg(test)]
#[path = "tests/set_ops_tests.rs"]
mod tests;
