/// A source of randomness for picking substitute characters.
///
/// Sessions never touch a global RNG so that tests can replay exact frames.
pub trait RandomSource: Send {
    /// Get a uniformly distributed index in `0..upper`.
    ///
    /// `upper` is always greater than zero.
    fn index(&mut self, upper: usize) -> usize;
}

/// The default random source, backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct FastRandom(fastrand::Rng);

impl FastRandom {
    pub fn new() -> Self {
        Self(fastrand::Rng::new())
    }

    /// Construct a reproducible random source.
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for FastRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRandom {
    fn index(&mut self, upper: usize) -> usize {
        self.0.usize(..upper)
    }
}

/// A random source that replays a fixed sequence of values.
///
/// Every value is reduced modulo the requested upper bound and the sequence wraps around once
/// exhausted. An empty sequence always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<usize>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, next: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn index(&mut self, upper: usize) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value % upper
    }
}

/// Shuffle a slice in place using Fisher-Yates.
pub(crate) fn shuffle<T>(rng: &mut dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn seeded_sources_agree() {
        let mut left = FastRandom::with_seed(42);
        let mut right = FastRandom::with_seed(42);
        for _ in 0..32 {
            assert_eq!(left.index(100), right.index(100));
        }
    }

    #[rstest]
    #[case::wraps(vec![1, 2], 10, vec![1, 2, 1, 2])]
    #[case::modulo(vec![7, 12], 5, vec![2, 2, 2, 2])]
    #[case::empty(vec![], 3, vec![0, 0, 0, 0])]
    fn scripted_sequence(#[case] values: Vec<usize>, #[case] upper: usize, #[case] expected: Vec<usize>) {
        let mut rng = ScriptedRandom::new(values);
        let produced: Vec<_> = (0..expected.len()).map(|_| rng.index(upper)).collect();
        assert_eq!(produced, expected);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = FastRandom::with_seed(7);
        let mut items: Vec<_> = (0..20).collect();
        shuffle(&mut rng, &mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn scripted_shuffle() {
        // i=2 picks 0, i=1 picks 0: [a, b, c] -> [c, b, a] -> [b, c, a]
        let mut rng = ScriptedRandom::new(vec![0]);
        let mut items = vec!['a', 'b', 'c'];
        shuffle(&mut rng, &mut items);
        assert_eq!(items, vec!['b', 'c', 'a']);
    }
}
