//! Template sequencing
//!
//! Expands a finite template list cyclically into the exact ordered
//! sequence of cells to render, clipped to one page's capacity.

use crate::types::{LabelError, Result};

/// Expand `templates` cyclically to `copies` entries, then truncate to
/// `max_cells`. Order is significant: entry `i` is always
/// `templates[i % len]`, duplicates included.
pub fn expand_sequence<'a, T>(
    templates: &'a [T],
    copies: usize,
    max_cells: usize,
) -> Result<Vec<&'a T>> {
    if templates.is_empty() {
        return Err(LabelError::validation(
            "templates",
            "at least one template is required",
        ));
    }

    let count = copies.min(max_cells);
    Ok((0..count).map(|i| &templates[i % templates.len()]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_template_repeats() {
        let templates = ["a"];
        let seq = expand_sequence(&templates, 6, 35).unwrap();
        assert_eq!(seq.len(), 6);
        assert!(seq.iter().all(|t| **t == "a"));
    }

    #[test]
    fn test_cycling_preserves_order() {
        let templates = ["a", "b", "c"];
        let seq = expand_sequence(&templates, 7, 35).unwrap();
        assert_eq!(seq.len(), 7);
        for (i, t) in seq.iter().enumerate() {
            assert_eq!(**t, templates[i % templates.len()]);
        }
    }

    #[test]
    fn test_truncated_to_capacity() {
        let templates = ["a", "b"];
        let seq = expand_sequence(&templates, 35, 12).unwrap();
        assert_eq!(seq.len(), 12);
    }

    #[test]
    fn test_empty_list_is_validation_error() {
        let templates: [&str; 0] = [];
        match expand_sequence(&templates, 5, 35) {
            Err(LabelError::Validation { field, .. }) => assert_eq!(field, "templates"),
            _ => panic!("Expected Validation error"),
        }
    }
}
