//! Reference data seeding.
//!
//! Seeding is get-or-create by unique name, so running it any number of
//! times, in any order, leaves exactly one row per name.

use std::fmt;
use std::future::Future;

/// Categories every store starts with.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Electronics",
    "Clothing",
    "Books",
    "Home & Kitchen",
    "Sports",
    "Toys",
    "Health & Beauty",
];

/// What happened to one seeded name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyExists,
}

impl fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::AlreadyExists => "already exists",
        })
    }
}

/// Storage that can get-or-create a category by name.
pub trait CategoryStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ensure a category named `name` exists.
    fn ensure_category(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<SeedOutcome, Self::Error>> + Send;
}

/// Per-name results of a seeding run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub entries: Vec<(String, SeedOutcome)>,
}

impl SeedReport {
    /// Number of names that were inserted by this run.
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(SeedOutcome::Created)
    }

    /// Number of names that were already present.
    #[must_use]
    pub fn existing(&self) -> usize {
        self.count(SeedOutcome::AlreadyExists)
    }

    fn count(&self, outcome: SeedOutcome) -> usize {
        self.entries.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Get-or-create each name in `names`.
///
/// # Errors
///
/// Stops at and returns the first store error.
pub async fn seed_categories<S: CategoryStore>(
    store: &S,
    names: &[&str],
) -> Result<SeedReport, S::Error> {
    let mut report = SeedReport::default();

    for name in names {
        let outcome = store.ensure_category(name).await?;
        tracing::debug!(category = *name, %outcome, "Seeded category");
        report.entries.push(((*name).to_string(), outcome));
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;
    use std::convert::Infallible;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        names: Mutex<BTreeSet<String>>,
    }

    impl CategoryStore for MemoryStore {
        type Error = Infallible;

        async fn ensure_category(&self, name: &str) -> Result<SeedOutcome, Self::Error> {
            let inserted = self.names.lock().unwrap().insert(name.to_string());
            Ok(if inserted {
                SeedOutcome::Created
            } else {
                SeedOutcome::AlreadyExists
            })
        }
    }

    #[tokio::test]
    async fn test_first_run_creates_everything() {
        let store = MemoryStore::default();
        let report = seed_categories(&store, DEFAULT_CATEGORIES).await.unwrap();

        assert_eq!(report.created(), DEFAULT_CATEGORIES.len());
        assert_eq!(report.existing(), 0);
        assert_eq!(report.entries[3], ("Home & Kitchen".to_string(), SeedOutcome::Created));
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let store = MemoryStore::default();
        seed_categories(&store, DEFAULT_CATEGORIES).await.unwrap();
        let before = store.names.lock().unwrap().clone();

        let report = seed_categories(&store, DEFAULT_CATEGORIES).await.unwrap();
        assert_eq!(report.created(), 0);
        assert_eq!(report.existing(), DEFAULT_CATEGORIES.len());
        assert_eq!(*store.names.lock().unwrap(), before);
    }

    #[tokio::test]
    async fn test_order_independent() {
        let forward = MemoryStore::default();
        seed_categories(&forward, DEFAULT_CATEGORIES).await.unwrap();

        let mut reversed_names = DEFAULT_CATEGORIES.to_vec();
        reversed_names.reverse();
        let reversed = MemoryStore::default();
        seed_categories(&reversed, &reversed_names).await.unwrap();

        assert_eq!(*forward.names.lock().unwrap(), *reversed.names.lock().unwrap());
    }

    #[tokio::test]
    async fn test_partial_overlap() {
        let store = MemoryStore::default();
        store.names.lock().unwrap().insert("Books".to_string());

        let report = seed_categories(&store, DEFAULT_CATEGORIES).await.unwrap();
        assert_eq!(report.existing(), 1);
        assert_eq!(report.created(), DEFAULT_CATEGORIES.len() - 1);
        assert_eq!(store.names.lock().unwrap().len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_default_categories_are_unique() {
        let unique: BTreeSet<_> = DEFAULT_CATEGORIES.iter().collect();
        assert_eq!(unique.len(), DEFAULT_CATEGORIES.len());
    }
}
