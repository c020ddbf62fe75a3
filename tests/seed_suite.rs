use kwsearch::{Config, MergePolicy, UnmatchedPolicy};
use test_log::test;

fn names(index: &kwsearch::SearchIndex<String>, query: &str, k: usize) -> Vec<String> {
    index
        .find_items(query, k)
        .into_iter()
        .map(|item| (*item).clone())
        .collect()
}

#[test]
fn s1_basic_rank() {
    let index = Config::<String>::new().build().expect("defaults are valid");
    index.add_item("A".to_string(), "onex two three");
    index.add_item("B".to_string(), "one two three");
    index.add_item("C".to_string(), "onexx two three");

    assert_eq!(names(&index, "one", 10), vec!["B", "A", "C"]);
}

#[test]
fn s2_intersection_selectivity() {
    let index = Config::<String>::new()
        .merge_policy(MergePolicy::Intersection)
        .build()
        .expect("defaults are valid");
    index.add_item("a".to_string(), "one two");
    index.add_item("b".to_string(), "two three");
    index.add_item("c".to_string(), "three four");

    assert_eq!(names(&index, "two three", 10), vec!["b"]);
}

#[test]
fn s3_intersection_empty() {
    let index = Config::<String>::new()
        .merge_policy(MergePolicy::Intersection)
        .build()
        .expect("defaults are valid");
    index.add_item("a".to_string(), "one two");
    index.add_item("b".to_string(), "two three");
    index.add_item("c".to_string(), "three four");

    assert!(names(&index, "five six", 10).is_empty());
}

#[test]
fn s4_backtracking() {
    let index = Config::<String>::new()
        .merge_policy(MergePolicy::Union)
        .unmatched_policy(UnmatchedPolicy::Backtracking)
        .build()
        .expect("defaults are valid");
    index.add_item("kw".to_string(), "keyword");
    index.add_item("kb".to_string(), "keyboard");

    assert_eq!(names(&index, "keywZ", 10), vec!["kw"]);
}

#[test]
fn s5_exact_denies() {
    let index = Config::<String>::new()
        .merge_policy(MergePolicy::Union)
        .unmatched_policy(UnmatchedPolicy::Exact)
        .build()
        .expect("defaults are valid");
    index.add_item("kw".to_string(), "keyword");
    index.add_item("kb".to_string(), "keyboard");

    assert!(names(&index, "keywZ", 10).is_empty());
}

#[test]
fn s6_remove_then_search() {
    let index = Config::<String>::new().build().expect("defaults are valid");
    index.add_item("a".to_string(), "shared keyword");
    index.add_item("b".to_string(), "shared keyword");
    index.add_item("c".to_string(), "shared keyword");

    assert_eq!(index.find_items("shared", 10).len(), 3);

    index.remove_item(&"a".to_string());
    assert_eq!(index.find_items("shared", 10).len(), 2);

    index.remove_item(&"b".to_string());
    assert_eq!(index.find_items("shared", 10).len(), 1);

    index.remove_item(&"c".to_string());
    assert_eq!(index.find_items("shared", 10).len(), 0);
    assert_eq!(index.get_stats().fragment_count, 0);
}
