//! Character-level brace depth scanning

/// Returns the prefix of `s` up to, but not including, the close brace that
/// matches an already-open scope.
///
/// The scan starts at depth 1: the caller has already consumed an opening
/// brace and `s` is everything after it. Every `{` increments the depth and
/// every `}` decrements it; the prefix ends at the first character where the
/// depth reaches zero. Unbalanced input yields the whole string.
pub fn balanced_block(s: &str) -> &str {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &s[..i];
                }
            }
            _ => {}
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_matching_close() {
        assert_eq!(balanced_block(" a 1 } trailing"), " a 1 ");
    }

    #[test]
    fn test_skips_nested_scopes() {
        assert_eq!(
            balanced_block(" appsvcs-discovery { } } session user-enabled"),
            " appsvcs-discovery { } "
        );
    }

    #[test]
    fn test_deeply_nested() {
        assert_eq!(balanced_block("a { b { c } } d } tail"), "a { b { c } } d ");
    }

    #[test]
    fn test_unbalanced_returns_everything() {
        assert_eq!(balanced_block(" a { b"), " a { b");
        assert_eq!(balanced_block(""), "");
    }

    #[test]
    fn test_immediate_close() {
        assert_eq!(balanced_block("}"), "");
    }
}
