//! Size-label handling and the post-parse reconciliation pass

use std::cmp::Ordering;

use crate::entities::OperationData;

/// Words that show up next to size lists on raw sheets but are not sizes
const SIZE_NOISE_WORDS: [&str; 6] = ["VARIANT", "SIZE", "RANGE", "NOTE", "DEPARTMENT", "SECTION"];

/// Extract an upper-cased size list from a raw-sheet cell (split on whitespace, `,` and `;`)
pub fn extract_sizes(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .map(|s| {
            let s = s.trim().to_uppercase();
            let s = s.strip_prefix('"').unwrap_or(&s);
            s.strip_suffix('"').unwrap_or(s).to_string()
        })
        .filter(|s| !s.is_empty() && !SIZE_NOISE_WORDS.contains(&s.as_str()))
        .collect()
}

/// Split a space-separated summary size list, keeping case as given
pub fn split_size_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Append the sizes from `extra` not already in `target`, keeping insertion order
pub fn union_into(target: &mut Vec<String>, extra: &[String]) {
    for size in extra {
        if !target.contains(size) {
            target.push(size.clone());
        }
    }
}

/// Union then sort ascending (plain lexical order)
pub fn union_sorted(target: &mut Vec<String>, extra: &[String]) {
    union_into(target, extra);
    target.sort();
}

/// Back-fill empty size lists on every operation, in order:
/// operation from its materials, then configs from the operation, then
/// materials from the operation. Afterwards each operation's `all_sizes`
/// also covers every size its configs and materials carry.
pub fn reconcile(operations: &mut [OperationData]) {
    for op in operations.iter_mut() {
        if op.all_sizes.is_empty() {
            let mut derived = Vec::new();
            for material in &op.materials {
                union_into(&mut derived, &material.sizes);
            }
            op.all_sizes = derived;
        }

        for config in op.configs.iter_mut() {
            if config.applicable_sizes.is_empty() {
                config.applicable_sizes = op.all_sizes.clone();
            }
        }

        for material in op.materials.iter_mut() {
            if material.sizes.is_empty() {
                material.sizes = op.all_sizes.clone();
            }
        }

        let carried: Vec<String> = op
            .configs
            .iter()
            .flat_map(|c| c.applicable_sizes.iter())
            .chain(op.materials.iter().flat_map(|m| m.sizes.iter()))
            .cloned()
            .collect();
        union_into(&mut op.all_sizes, &carried);
    }
}

/// Sorted union of every operation's `all_sizes`
pub fn unique_sizes(operations: &[OperationData]) -> Vec<String> {
    let mut sizes = Vec::new();
    for op in operations {
        union_into(&mut sizes, &op.all_sizes);
    }
    sizes.sort();
    sizes
}

/// Numeric-aware ordering used for display (size labels and operation steps)
///
/// Digit runs compare by value, everything else lexically; ties fall back to
/// plain string order so the result is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_digits(&mut left);
                let rn = take_digits(&mut right);
                let ord = compare_digit_runs(&ln, &rn);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) if l.is_ascii_digit() != r.is_ascii_digit() => {
                return if l.is_ascii_digit() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MaterialInfo, OperationConfig};

    fn sizes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_sizes_normalizes_and_drops_noise() {
        assert_eq!(extract_sizes("s m, l;xl"), sizes(&["S", "M", "L", "XL"]));
        assert_eq!(
            extract_sizes("Size range: \"S\" M"),
            sizes(&["RANGE:", "S", "M"])
        );
        assert!(extract_sizes("").is_empty());
        assert!(extract_sizes("VARIANT SIZE NOTE").is_empty());
    }

    #[test]
    fn test_union_into_dedupes_in_insertion_order() {
        let mut target = sizes(&["M", "S"]);
        union_into(&mut target, &sizes(&["S", "L", "M", "XL"]));
        assert_eq!(target, sizes(&["M", "S", "L", "XL"]));
    }

    #[test]
    fn test_union_sorted() {
        let mut target = sizes(&["S"]);
        union_sorted(&mut target, &sizes(&["M", "L", "S"]));
        assert_eq!(target, sizes(&["L", "M", "S"]));
    }

    #[test]
    fn test_reconcile_fallback_order() {
        let mut op = OperationData::new("010", "Join", "SEWING");
        op.materials.push(MaterialInfo::new("Thread 40/2", sizes(&["S", "M"])));
        op.materials.push(MaterialInfo::new("Label woven", vec![]));
        op.configs.push(OperationConfig::new("001", vec![]));

        let mut ops = vec![op];
        reconcile(&mut ops);

        let op = &ops[0];
        assert_eq!(op.all_sizes, sizes(&["S", "M"]));
        assert_eq!(op.configs[0].applicable_sizes, sizes(&["S", "M"]));
        assert_eq!(op.materials[1].sizes, sizes(&["S", "M"]));
    }

    #[test]
    fn test_reconcile_keeps_all_sizes_superset() {
        let mut op = OperationData::new("010", "Join", "SEWING");
        op.all_sizes = sizes(&["S"]);
        op.configs.push(OperationConfig::new("001", sizes(&["S", "M"])));
        op.materials.push(MaterialInfo::new("Thread 40/2", sizes(&["XL"])));

        let mut ops = vec![op];
        reconcile(&mut ops);

        let op = &ops[0];
        for size in op
            .configs
            .iter()
            .flat_map(|c| &c.applicable_sizes)
            .chain(op.materials.iter().flat_map(|m| &m.sizes))
        {
            assert!(op.all_sizes.contains(size), "missing {size}");
        }
    }

    #[test]
    fn test_reconcile_leaves_empty_operation_empty() {
        let mut ops = vec![OperationData::new("010", "Join", "SEWING")];
        reconcile(&mut ops);
        assert!(ops[0].all_sizes.is_empty());
    }

    #[test]
    fn test_unique_sizes_sorted_union() {
        let mut a = OperationData::new("010", "A", "S");
        a.all_sizes = sizes(&["S", "M"]);
        let mut b = OperationData::new("020", "B", "S");
        b.all_sizes = sizes(&["M", "L"]);
        assert_eq!(unique_sizes(&[a, b]), sizes(&["L", "M", "S"]));
    }

    #[test]
    fn test_natural_cmp() {
        let mut stts = sizes(&["100", "020", "9", "010A", "010"]);
        stts.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(stts, sizes(&["9", "010", "010A", "020", "100"]));

        let mut labels = sizes(&["XL", "38", "S", "110", "M"]);
        labels.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(labels, sizes(&["38", "110", "M", "S", "XL"]));
    }
}
