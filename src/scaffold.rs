//! # Filter Scaffolding
//!
//! File templating behind the `make-filter` binary. A name like
//! `PostFilter` becomes `post_filter.rs` in the target directory; a nested
//! name like `Blog/CategoryFilter` lands in a `blog/` subdirectory. Existing
//! files are only overwritten with `--force`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ScaffoldError;

/// Fixed message printed after a successful scaffold.
pub const SUCCESS_MESSAGE: &str = "Filter created successfully.";

const FILTER_STUB: &str = r"use filtercrate::{Filter, HandlerTable};

#[derive(Default)]
pub struct DummyFilter;

impl Filter for DummyFilter {
    // TODO: point Builder at the entity's select, e.g.
    // `filtercrate::SelectBuilder<posts::Entity>`.
    type Builder = filtercrate::SelectBuilder<Entity>;

    fn register(table: &mut HandlerTable<Self>) {
        let _ = table;
    }
}
";

/// Render the filter stub for `type_name`.
#[must_use]
pub fn render_stub(type_name: &str) -> String {
    FILTER_STUB.replace("DummyFilter", type_name)
}

/// Convert a `CamelCase` type name to its `snake_case` file name.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn split_name(name: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
    let type_name = segments.pop().unwrap_or(name);
    (segments, type_name)
}

/// Create the filter source file for `name` under `base_dir`.
///
/// Returns the path of the created file.
///
/// # Errors
///
/// [`ScaffoldError::AlreadyExists`] when the target file exists and `force`
/// is unset; [`ScaffoldError::Io`] when directory creation or the write
/// fails.
pub fn make_filter(base_dir: &Path, name: &str, force: bool) -> Result<PathBuf, ScaffoldError> {
    let (modules, type_name) = split_name(name);

    let mut path = base_dir.to_path_buf();
    for module in &modules {
        path.push(snake_case(module));
    }
    fs::create_dir_all(&path)?;
    path.push(format!("{}.rs", snake_case(type_name)));

    if path.exists() && !force {
        return Err(ScaffoldError::AlreadyExists(path));
    }

    fs::write(&path, render_stub(type_name))?;
    tracing::debug!(path = %path.display(), "filter scaffolded");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_on_uppercase() {
        assert_eq!(snake_case("PostFilter"), "post_filter");
        assert_eq!(snake_case("CategoryFilter"), "category_filter");
        assert_eq!(snake_case("Blog"), "blog");
        assert_eq!(snake_case("HTTPFilter"), "h_t_t_p_filter");
    }

    #[test]
    fn stub_declares_the_filter_type() {
        let stub = render_stub("PostFilter");
        assert!(stub.contains("pub struct PostFilter;"));
        assert!(stub.contains("impl Filter for PostFilter {"));
        assert!(!stub.contains("DummyFilter"));
    }

    #[test]
    fn nested_names_split_into_modules() {
        let (modules, type_name) = split_name("Blog/CategoryFilter");
        assert_eq!(modules, vec!["Blog"]);
        assert_eq!(type_name, "CategoryFilter");

        let (modules, type_name) = split_name("PostFilter");
        assert!(modules.is_empty());
        assert_eq!(type_name, "PostFilter");
    }
}
