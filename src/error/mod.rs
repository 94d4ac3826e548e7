use strum::Display;

/// Host-supplied data that must be set before lookups can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Setup {
    #[strum(to_string = "cp_data.set_placeholders()")]
    Placeholders,
    #[strum(
        to_string = "cp_data.set_contentitem_metadata(). Does the ModelAdmin inherit from the correct base class?"
    )]
    ContentItemMetadata,
}

#[derive(Debug, thiserror::Error)]
pub enum CpError {
    #[error("{0} was never called")]
    Uninitialized(Setup),
    #[error("get_placeholder_by_slot() received empty value")]
    EmptySlot,
    #[error("form row id has no numeric index: {0}")]
    MalformedRowId(String),
    #[error("form row not found: {0}")]
    UnknownRow(String),
    #[error("form field not found: #{0}")]
    MissingField(String),
    #[error("unable to generate item uid: {0}")]
    Entropy(String),
    #[error("unable to restore tree structure of new items: {}", .0.join(", "))]
    UnresolvedParents(Vec<String>),
    #[error("invalid host data: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type CpResult<T> = Result<T, CpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_message_names_the_setter() {
        let e = CpError::Uninitialized(Setup::Placeholders);
        assert_eq!(e.to_string(), "cp_data.set_placeholders() was never called");

        let e = CpError::Uninitialized(Setup::ContentItemMetadata);
        assert!(e.to_string().starts_with("cp_data.set_contentitem_metadata()"));
    }

    #[test]
    fn test_unresolved_parents_lists_items() {
        let e = CpError::UnresolvedParents(vec!["a -> b".to_string(), "c -> d".to_string()]);
        assert!(e.to_string().ends_with("a -> b, c -> d"));
    }
}
