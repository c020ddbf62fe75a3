// Configuration surface for a `SearchIndex`: the extractor, normaliser
// and scorer callbacks plus the policy knobs of the query planner, all
// probed and validated before the index is built.

use crate::error::{Error, Result};
use crate::index::SearchIndex;
use std::fmt;
use std::sync::Arc;

/// What to do when a query token has no matching fragment node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedPolicy {
    /// Give up: an unmatched token contributes nothing.
    Exact,
    /// Shorten the token from either end and retry, recursively.
    Backtracking,
}

/// How per-token result maps are combined into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Sum scores across all tokens' maps.
    Union,
    /// Keep only items present under every token, summing scores.
    Intersection,
}

/// Extracts a free-form string into a bag of raw tokens.
pub type Extractor = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Canonicalises a single raw token. An empty return drops the token.
pub type Normaliser = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Scores a `(query fragment, stored keyword)` pair.
pub type Scorer = Arc<dyn Fn(&str, &str) -> f64 + Send + Sync>;

/// Splits on runs of non-alphanumeric characters.
fn default_extractor(raw: &str) -> Vec<String> {
    raw.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lower-cases the token via its Unicode-aware mapping.
fn default_normaliser(token: &str) -> String {
    token.to_lowercase()
}

/// `|query| / |stored|`, plus a 1.0 boost when `stored` begins with `query`.
fn default_scorer(query_fragment: &str, stored_keyword: &str) -> f64 {
    let base = query_fragment.chars().count() as f64 / stored_keyword.chars().count() as f64;
    if stored_keyword.starts_with(query_fragment) {
        base + 1.0
    } else {
        base
    }
}

/// How much of the cache's byte budget to treat specially.
pub const CACHE_BYTES_DISABLED: i64 = 0;
/// Treated as an effectively unlimited cache budget.
pub const CACHE_BYTES_UNLIMITED: i64 = -1;

/// Builder for a [`SearchIndex`].
///
/// ```
/// use kwsearch::{Config, MergePolicy};
///
/// let index = Config::<String>::new()
///     .merge_policy(MergePolicy::Union)
///     .min_keyword_length(2)
///     .build()
///     .expect("default callbacks are always valid");
/// ```
pub struct Config<T> {
    pub(crate) extractor: Extractor,
    pub(crate) normaliser: Normaliser,
    pub(crate) scorer: Scorer,
    pub(crate) min_keyword_length: usize,
    pub(crate) unmatched_policy: UnmatchedPolicy,
    pub(crate) merge_policy: MergePolicy,
    pub(crate) cache_byte_budget: i64,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Config<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("min_keyword_length", &self.min_keyword_length)
            .field("unmatched_policy", &self.unmatched_policy)
            .field("merge_policy", &self.merge_policy)
            .field("cache_byte_budget", &self.cache_byte_budget)
            .finish_non_exhaustive()
    }
}

impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Self {
            extractor: self.extractor.clone(),
            normaliser: self.normaliser.clone(),
            scorer: self.scorer.clone(),
            min_keyword_length: self.min_keyword_length,
            unmatched_policy: self.unmatched_policy,
            merge_policy: self.merge_policy,
            cache_byte_budget: self.cache_byte_budget,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> Default for Config<T> {
    fn default() -> Self {
        Self {
            extractor: Arc::new(default_extractor),
            normaliser: Arc::new(default_normaliser),
            scorer: Arc::new(default_scorer),
            min_keyword_length: 2,
            unmatched_policy: UnmatchedPolicy::Backtracking,
            merge_policy: MergePolicy::Union,
            cache_byte_budget: 16 * 1_024 * 1_024,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> Config<T>
where
    T: Eq + std::hash::Hash + Send + Sync + 'static,
{
    /// Starts a new configuration with all defaults from §6.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the raw-string-to-tokens extractor.
    #[must_use]
    pub fn extractor<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.extractor = Arc::new(f);
        self
    }

    /// Sets the per-token canonicalisation function.
    #[must_use]
    pub fn normaliser<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.normaliser = Arc::new(f);
        self
    }

    /// Sets the `(query fragment, stored keyword) -> score` function.
    #[must_use]
    pub fn scorer<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> f64 + Send + Sync + 'static,
    {
        self.scorer = Arc::new(f);
        self
    }

    /// Sets the minimum admissible keyword length. Must be ≥ 1.
    #[must_use]
    pub fn min_keyword_length(mut self, n: usize) -> Self {
        self.min_keyword_length = n.max(1);
        self
    }

    /// Sets what happens when a query token matches nothing.
    #[must_use]
    pub fn unmatched_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.unmatched_policy = policy;
        self
    }

    /// Sets how per-token result maps combine.
    #[must_use]
    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Sets the cache's byte budget.
    ///
    /// `0` disables caching entirely; a negative value (conventionally
    /// `-1`) is treated as an effectively unlimited budget.
    #[must_use]
    pub fn cache_byte_budget(mut self, bytes: i64) -> Self {
        self.cache_byte_budget = bytes;
        self
    }

    /// Validates the configuration and assembles a [`SearchIndex`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `min_keyword_length` is 0,
    /// or if a supplied callback returns an invalid value or panics
    /// when probed with a sentinel input.
    pub fn build(self) -> Result<SearchIndex<T>> {
        self.validate()?;
        Ok(SearchIndex::new(self))
    }

    fn validate(&self) -> Result<()> {
        if self.min_keyword_length == 0 {
            return Err(Error::InvalidConfig(
                "min_keyword_length must be at least 1".into(),
            ));
        }

        probe(&self.extractor, "extractor")?;
        probe(&self.normaliser, "normaliser")?;
        probe_scorer(&self.scorer)?;

        Ok(())
    }
}

trait Probe {
    fn probe_with(&self, sentinel: &str) -> std::result::Result<(), ()>;
}

impl Probe for Extractor {
    fn probe_with(&self, sentinel: &str) -> std::result::Result<(), ()> {
        let f = self.clone();
        let sentinel = sentinel.to_string();
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _ = f(&sentinel);
        }))
        .map_err(|_| ())
    }
}

impl Probe for Normaliser {
    fn probe_with(&self, sentinel: &str) -> std::result::Result<(), ()> {
        let f = self.clone();
        let sentinel = sentinel.to_string();
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _ = f(&sentinel);
        }))
        .map_err(|_| ())
    }
}

/// Probes a single-argument callback with the empty string, then a
/// non-empty sentinel, catching any panic and turning it into an error.
fn probe<F: Probe>(f: &F, name: &str) -> Result<()> {
    f.probe_with("").map_err(|()| {
        Error::InvalidConfig(format!("{name} panicked when probed with an empty string"))
    })?;
    f.probe_with("probe").map_err(|()| {
        Error::InvalidConfig(format!(
            "{name} panicked when probed with a non-empty sentinel"
        ))
    })?;
    Ok(())
}

fn probe_scorer(scorer: &Scorer) -> Result<()> {
    let f = scorer.clone();
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _ = f("probe", "probe");
    }))
    .map_err(|_| Error::InvalidConfig("scorer panicked when probed with sentinel input".into()))
}
