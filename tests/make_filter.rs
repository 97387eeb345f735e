//! Scaffolding tests for the `make-filter` templating.

use std::fs;

use filtercrate::scaffold::make_filter;

#[test]
fn creates_the_filter_file_from_the_type_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = make_filter(dir.path(), "PostFilter", false).unwrap();

    assert_eq!(path, dir.path().join("post_filter.rs"));
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("pub struct PostFilter;"));
    assert!(contents.contains("impl Filter for PostFilter {"));
}

#[test]
fn nested_names_create_module_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = make_filter(dir.path(), "Blog/CategoryFilter", false).unwrap();

    assert_eq!(path, dir.path().join("blog").join("category_filter.rs"));
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("impl Filter for CategoryFilter {"));
}

#[test]
fn refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    make_filter(dir.path(), "PostFilter", false).unwrap();

    let err = make_filter(dir.path(), "PostFilter", false).unwrap_err();
    assert!(err.is_already_exists());
}

#[test]
fn force_overwrites_an_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = make_filter(dir.path(), "PostFilter", false).unwrap();
    fs::write(&path, "edited by hand").unwrap();

    let rewritten = make_filter(dir.path(), "PostFilter", true).unwrap();
    assert_eq!(rewritten, path);
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("impl Filter for PostFilter {"));
}
