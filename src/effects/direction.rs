use serde::Deserialize;
use std::collections::BTreeSet;
use strum::EnumString;

/// The order in which characters are revealed in sequential mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RevealDirection {
    /// Left to right.
    #[default]
    Start,

    /// Right to left.
    End,

    /// Outwards from the middle, alternating right and left.
    Center,
}

impl RevealDirection {
    /// Get the next index to reveal in a text of `length` characters.
    ///
    /// If the preferred index for this direction is out of bounds or already revealed, the lowest
    /// unrevealed index is used instead. This returns `None` only once every index is revealed.
    pub fn next_index(&self, length: usize, revealed: &BTreeSet<usize>) -> Option<usize> {
        let count = revealed.len();
        let preferred = match self {
            Self::Start => Some(count),
            Self::End => length.checked_sub(count + 1),
            Self::Center => {
                let middle = length / 2;
                let offset = count / 2;
                if count % 2 == 0 { Some(middle + offset) } else { middle.checked_sub(offset + 1) }
            }
        };
        match preferred {
            Some(index) if index < length && !revealed.contains(&index) => Some(index),
            _ => (0..length).find(|index| !revealed.contains(index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn full_order(direction: RevealDirection, length: usize) -> Vec<usize> {
        let mut revealed = BTreeSet::new();
        let mut order = Vec::new();
        while let Some(index) = direction.next_index(length, &revealed) {
            assert!(revealed.insert(index), "index {index} revealed twice");
            order.push(index);
        }
        order
    }

    #[rstest]
    #[case::start(RevealDirection::Start, 5, vec![0, 1, 2, 3, 4])]
    #[case::end(RevealDirection::End, 5, vec![4, 3, 2, 1, 0])]
    #[case::center_odd(RevealDirection::Center, 5, vec![2, 1, 3, 0, 4])]
    #[case::center_even(RevealDirection::Center, 4, vec![2, 1, 3, 0])]
    #[case::center_single(RevealDirection::Center, 1, vec![0])]
    #[case::empty(RevealDirection::Center, 0, vec![])]
    fn reveal_order(#[case] direction: RevealDirection, #[case] length: usize, #[case] expected: Vec<usize>) {
        assert_eq!(full_order(direction, length), expected);
    }

    #[rstest]
    fn visits_every_index_once(
        #[values(RevealDirection::Start, RevealDirection::End, RevealDirection::Center)] direction: RevealDirection,
        #[values(0, 1, 2, 3, 7, 10, 31)] length: usize,
    ) {
        let order = full_order(direction, length);
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, (0..length).collect::<Vec<_>>());
    }

    #[test]
    fn center_falls_back_to_lowest_unrevealed() {
        // With 2 revealed the preferred index is 4, which is taken.
        let revealed = BTreeSet::from([4, 5]);
        assert_eq!(RevealDirection::Center.next_index(7, &revealed), Some(0));

        let revealed = BTreeSet::from([0, 1, 3, 5]);
        assert_eq!(RevealDirection::Center.next_index(7, &revealed), Some(2));
    }

    #[test]
    fn center_always_finds_unrevealed() {
        let length = 9;
        // Every subset of a small text.
        for mask in 0u32..(1 << length) {
            let revealed: BTreeSet<usize> = (0..length).filter(|i| mask & (1 << i) != 0).collect();
            let next = RevealDirection::Center.next_index(length, &revealed);
            if revealed.len() == length {
                assert_eq!(next, None);
            } else {
                let next = next.expect("no index");
                assert!(!revealed.contains(&next));
            }
        }
    }

    #[rstest]
    #[case("start", RevealDirection::Start)]
    #[case("end", RevealDirection::End)]
    #[case("center", RevealDirection::Center)]
    fn parse(#[case] input: &str, #[case] expected: RevealDirection) {
        assert_eq!(input.parse::<RevealDirection>().unwrap(), expected);
    }
}
