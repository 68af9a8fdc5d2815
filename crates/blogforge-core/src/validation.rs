//! Field-level validation for new posts.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{CreatePostInput, NewPost};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const MIN_TAGS: usize = 1;
pub const MAX_TAGS: usize = 5;

/// Messages keyed by the offending field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.0.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Check a submitted post and bind it to its author.
pub fn validate_post(author_id: Uuid, input: CreatePostInput) -> Result<NewPost, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if is_blank(&input.title) {
        errors.add("title", "Title is required");
    } else if input.title.chars().count() > TITLE_MAX_CHARS {
        errors.add(
            "title",
            format!("Title must be at most {TITLE_MAX_CHARS} characters"),
        );
    }

    if is_blank(&input.description) {
        errors.add("description", "Description is required");
    } else if input.description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.add(
            "description",
            format!("Description must be at most {DESCRIPTION_MAX_CHARS} characters"),
        );
    }

    if is_blank(&input.content) {
        errors.add("content", "Content is required");
    }

    if input.tags.len() < MIN_TAGS {
        errors.add("tags", "At least one tag is required");
    } else if input.tags.len() > MAX_TAGS {
        errors.add("tags", format!("Maximum {MAX_TAGS} tags allowed"));
    }
    if input.tags.iter().any(|t| is_blank(t)) {
        errors.add("tags", "Tags must not be empty");
    }

    if errors.is_empty() {
        Ok(NewPost::from_valid(author_id, input))
    } else {
        Err(errors)
    }
}
