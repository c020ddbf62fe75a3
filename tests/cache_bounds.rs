use kwsearch::Config;
use test_log::test;

/// S7 — adaptive cache bounds. A cache budget small enough to admit
/// only ~100 (item, score) entries, fed walk results that are each
/// orders of magnitude larger, must degrade monotonically: shrinking
/// `key_length_limit` on every overflow and eventually disabling
/// itself rather than thrashing forever.
#[test]
fn sustained_pressure_disables_the_cache_and_drains_it() {
    let index = Config::<String>::new()
        .min_keyword_length(1)
        .cache_byte_budget(100 * 60) // maxEntries ~= 100
        .build()
        .expect("defaults are valid");

    // One keyword shared by ten thousand items: any walk rooted at
    // "x" returns a 10_000-entry score map, wildly over budget.
    for i in 0..10_000 {
        index.add_item(format!("item-{i}"), "x");
    }

    // Thirty-one one-character queries: each hit recomputes (the
    // previous cached entry for "x" was already evicted), and every
    // insertion attempt is over budget, so every query advances the
    // degradation protocol by at least one step.
    for _ in 0..27 {
        let _ = index.find_items("x", 1);
    }
    for letter in ["x", "x", "x", "x"] {
        let _ = index.find_items(letter, 1);
    }

    let stats = index.get_cache_stats();
    assert!(!stats.enabled, "sustained pressure must disable the cache");
    assert_eq!(stats.current_entries, 0);
    assert!(stats.evictions >= 10);
    assert!(stats.key_length_limit < 1);
}

#[test]
fn light_pressure_shrinks_the_limit_without_disabling() {
    let index = Config::<String>::new()
        .min_keyword_length(1)
        .cache_byte_budget(1_000 * 60)
        .build()
        .expect("defaults are valid");

    for i in 0..2_000 {
        index.add_item(format!("item-{i}"), "x");
    }

    let _ = index.find_items("x", 1);

    let stats = index.get_cache_stats();
    assert!(stats.enabled);
    assert!(stats.key_length_limit < 10);
}
