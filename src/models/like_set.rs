use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of user ids that liked an entity.
///
/// Stored as an array of plain user ids. Toggling happens in the database
/// with a single `UPDATE` (see `helpers::like_helpers`), never by loading,
/// mutating and writing back this value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeSet(BTreeSet<String>);

impl LikeSet {
    pub fn contains(&self, user_id: &str) -> bool {
        self.0.contains(user_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for LikeSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let likes: LikeSet = serde_json::from_str(r#"["a", "b", "a"]"#).unwrap();
        assert_eq!(likes.len(), 2);
        assert!(likes.contains("a"));
        assert!(!likes.contains("c"));
    }

    #[test]
    fn test_serializes_as_sorted_array() {
        let likes: LikeSet = ["zed".to_string(), "amy".to_string()].into_iter().collect();
        assert_eq!(serde_json::to_string(&likes).unwrap(), r#"["amy","zed"]"#);
        assert!(LikeSet::default().is_empty());
    }
}
