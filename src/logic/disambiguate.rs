use crate::model::{DiagnosticKind, Diagnostics};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// Make every label unique by suffixing duplicates with `_N`.
///
/// Occurrences are numbered from the back: the first of three `A`s becomes
/// `A_3`, the second `A_2`, and the last keeps `A`. A suffix whose label is
/// already taken (say an input that has both `A` twice and `A_2`) is skipped
/// in favour of the next free one, so labels that were unique in the input
/// are never renamed. `category` only flavours the warnings.
pub fn disambiguate<S: AsRef<str>>(
    labels: &[S],
    category: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let labels: Vec<&str> = labels.iter().map(|l| l.as_ref()).collect();
    let counts = labels.iter().copied().counts();
    let mut taken: HashSet<String> = labels.iter().map(|l| l.to_string()).collect();

    // Free suffixes per duplicated label, ascending; popped largest first
    let mut suffixes: HashMap<&str, Vec<usize>> = HashMap::new();
    for label in labels.iter().copied().unique() {
        let needed = counts[label] - 1;
        if needed == 0 {
            continue;
        }
        let mut free = Vec::with_capacity(needed);
        let mut suffix = 2;
        while free.len() < needed {
            let candidate = format!("{}_{}", label, suffix);
            if taken.insert(candidate) {
                free.push(suffix);
            }
            suffix += 1;
        }
        suffixes.insert(label, free);
    }

    labels
        .iter()
        .map(|&label| match suffixes.get_mut(label).and_then(|free| free.pop()) {
            Some(suffix) => {
                let rewritten = format!("{}_{}", label, suffix);
                diagnostics.warn(
                    DiagnosticKind::DuplicateLabel,
                    format!(
                        "Found duplicate {} name. Rewriting {} to {}",
                        category, label, rewritten
                    ),
                );
                rewritten
            }
            None => label.to_string(),
        })
        .collect()
}
