/// The substitute characters used unless a text provides its own.
pub const DEFAULT_CHARACTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!@#$%^&*()_+";

/// Build the pool of substitute characters for a text.
///
/// When `original_only` is set the pool is made of the distinct non-whitespace characters in
/// `text`, in order of first appearance. Otherwise it's every character in `characters`.
pub(crate) fn candidate_pool(text: &[char], characters: &str, original_only: bool) -> Vec<char> {
    if original_only {
        let mut pool = Vec::new();
        for &c in text {
            if !c.is_whitespace() && !pool.contains(&c) {
                pool.push(c);
            }
        }
        pool
    } else {
        characters.chars().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[rstest]
    #[case::dedup("HELLO WORLD", vec!['H', 'E', 'L', 'O', 'W', 'R', 'D'])]
    #[case::whitespace_only(" \t\n", vec![])]
    #[case::empty("", vec![])]
    fn original_pool(#[case] text: &str, #[case] expected: Vec<char>) {
        assert_eq!(candidate_pool(&chars(text), DEFAULT_CHARACTERS, true), expected);
    }

    #[test]
    fn custom_pool() {
        assert_eq!(candidate_pool(&chars("hi"), "01", false), vec!['0', '1']);
        assert!(candidate_pool(&chars("hi"), "", false).is_empty());
    }
}
