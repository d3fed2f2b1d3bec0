//! Template-to-command materialization.
//!
//! Substitutes a block's stored parameter values into its command template,
//! one value per placeholder occurrence, then normalizes whitespace so that
//! unset parameters do not leave gaps in the final command string.

use std::fmt;

use crate::workflow::{template_segments, Block, Segment};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterializeError {
    /// The block's parameter vector does not match its template, which means
    /// the block was never initialized properly.
    MissingBlockState,
}

impl fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterializeError::MissingBlockState => write!(f, "missing block state"),
        }
    }
}

impl std::error::Error for MaterializeError {}

/// Resolve `block`'s template and values into the final command string.
///
/// Placeholder occurrences are replaced in order with
/// `parameter_values[index]` (empty string meaning "no value"), whitespace
/// runs collapse to a single space and the result is trimmed. The block is
/// not mutated, so the operation is idempotent for identical values.
pub fn materialize(block: &Block) -> Result<String, MaterializeError> {
    substitute(&block.descriptor.command_template, &block.parameter_values)
}

pub fn substitute(template: &str, values: &[String]) -> Result<String, MaterializeError> {
    let segments = template_segments(template);
    let slots = segments
        .iter()
        .filter(|s| matches!(s, Segment::Placeholder(_)))
        .count();
    if values.len() != slots {
        return Err(MaterializeError::MissingBlockState);
    }

    let mut raw = String::with_capacity(template.len());
    let mut next_value = values.iter();
    for segment in segments {
        match segment {
            Segment::Literal(text) => raw.push_str(text),
            Segment::Placeholder(_) => {
                // slot count was checked above
                raw.push_str(next_value.next().map(String::as_str).unwrap_or(""));
            }
        }
    }

    Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommandDescriptor;
    use crate::workflow::Block;

    fn block(template: &str, values: &[&str]) -> Block {
        let descriptor = CommandDescriptor {
            command_name: "test".to_string(),
            description: String::new(),
            command_template: template.to_string(),
            available_options: None,
        };
        let mut block = Block::new(1, descriptor, 0.0, 0.0);
        for (i, v) in values.iter().enumerate() {
            block.parameter_values[i] = v.to_string();
        }
        block
    }

    #[test]
    fn substitutes_values_in_occurrence_order() {
        let b = block("scan {target} {options}", &["10.0.0.1", "-sV"]);
        assert_eq!(materialize(&b).unwrap(), "scan 10.0.0.1 -sV");
    }

    #[test]
    fn empty_values_collapse_cleanly() {
        let b = block("scan {target} {options}", &["10.0.0.1", ""]);
        assert_eq!(materialize(&b).unwrap(), "scan 10.0.0.1");
    }

    #[test]
    fn repeated_placeholders_use_independent_slots() {
        let b = block("cp {file} {file}", &["a.txt", "b.txt"]);
        assert_eq!(materialize(&b).unwrap(), "cp a.txt b.txt");
    }

    #[test]
    fn does_not_mutate_and_is_idempotent() {
        let b = block("ssh {host} -p {port}", &["bandit.labs", "2220"]);
        let first = materialize(&b).unwrap();
        let second = materialize(&b).unwrap();
        assert_eq!(first, second);
        assert_eq!(b.parameter_values, vec!["bandit.labs", "2220"]);
    }

    #[test]
    fn uninitialized_state_is_rejected() {
        let mut b = block("cat {file}", &["flag.txt"]);
        b.parameter_values.clear();
        assert_eq!(materialize(&b).unwrap_err(), MaterializeError::MissingBlockState);
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        let b = block("  ls   -la  ", &[]);
        assert_eq!(materialize(&b).unwrap(), "ls -la");
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_leaves_whitespace_runs(values in proptest::collection::vec("[a-z0-9 ]{0,8}", 2)) {
                let b = block("run {a} then {b}", &[values[0].as_str(), values[1].as_str()]);
                let command = materialize(&b).unwrap();
                prop_assert!(!command.contains("  "));
                prop_assert_eq!(command.trim(), command.as_str());
            }

            #[test]
            fn idempotent_for_any_values(values in proptest::collection::vec(".{0,12}", 2)) {
                let b = block("x {p} y {q}", &[values[0].as_str(), values[1].as_str()]);
                prop_assert_eq!(materialize(&b).unwrap(), materialize(&b).unwrap());
            }
        }
    }
}
