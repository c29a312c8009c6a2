//! Sweep enumeration.
//!
//! [`Sweeper`] expands a [`SweepSpace`] into the Cartesian product of its
//! candidate leaves, repeated for a configurable number of rounds. The
//! enumeration is lazy and restartable: it is a pure function of the space,
//! so iterating twice yields element-wise identical sequences.
//!
//! Order convention: keys enumerate in space order, depth-first; the last
//! leaf varies fastest. `{a: [1, 2], b: [10, 20]}` yields
//! `(1,10), (1,20), (2,10), (2,20)`.

use sr_types::{ConcreteConfig, ConfigValue, ParamDomain, SweepSpace};

/// Enumerates every concrete configuration of a sweep space, `repeat`
/// rounds back to back.
#[derive(Debug, Clone)]
pub struct Sweeper<'a> {
    space: &'a SweepSpace,
    repeat: usize,
}

impl<'a> Sweeper<'a> {
    pub fn new(space: &'a SweepSpace, repeat: usize) -> Self {
        Self { space, repeat }
    }

    /// Start (or restart) the enumeration from the beginning.
    pub fn iter(&self) -> SweepIter<'a> {
        let lens = self.space.leaf_lengths();
        SweepIter {
            space: self.space,
            digits: vec![0; lens.len()],
            lens,
            rounds_left: self.repeat,
            fresh: true,
        }
    }

    /// Total number of configurations across all rounds, `None` on
    /// overflow.
    pub fn total(&self) -> Option<usize> {
        self.space.cardinality()?.checked_mul(self.repeat)
    }
}

impl<'a> IntoIterator for &Sweeper<'a> {
    type Item = ConcreteConfig;
    type IntoIter = SweepIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy mixed-radix counter over the flattened leaf lengths.
pub struct SweepIter<'a> {
    space: &'a SweepSpace,
    lens: Vec<usize>,
    digits: Vec<usize>,
    rounds_left: usize,
    fresh: bool,
}

impl SweepIter<'_> {
    fn materialize(&self) -> ConcreteConfig {
        let mut cursor = 0;
        build_config(self.space, &self.digits, &mut cursor)
    }
}

impl Iterator for SweepIter<'_> {
    type Item = ConcreteConfig;

    fn next(&mut self) -> Option<ConcreteConfig> {
        if self.rounds_left == 0 || self.lens.iter().any(|&len| len == 0) {
            return None;
        }
        if self.fresh {
            self.fresh = false;
            return Some(self.materialize());
        }

        // Advance the odometer, last leaf fastest.
        let mut pos = self.digits.len();
        loop {
            if pos == 0 {
                // Wrapped every digit: the round is complete.
                self.rounds_left -= 1;
                if self.rounds_left == 0 {
                    return None;
                }
                return Some(self.materialize());
            }
            pos -= 1;
            self.digits[pos] += 1;
            if self.digits[pos] < self.lens[pos] {
                return Some(self.materialize());
            }
            self.digits[pos] = 0;
        }
    }
}

/// Resolve the space against the current digit vector. `cursor` indexes the
/// flattened leaves in traversal order.
fn build_config(space: &SweepSpace, digits: &[usize], cursor: &mut usize) -> ConcreteConfig {
    let mut config = ConcreteConfig::new();
    for (name, domain) in space.entries() {
        let node = match domain {
            ParamDomain::Values(values) => {
                let value = values[digits[*cursor]].clone();
                *cursor += 1;
                ConfigValue::Value(value)
            }
            ParamDomain::Nested(sub) => ConfigValue::Nested(build_config(sub, digits, cursor)),
        };
        config.insert(name, node);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_types::ParamValue;

    fn flat_space() -> SweepSpace {
        SweepSpace::new().add_ints("a", [1, 2]).add_ints("b", [10, 20])
    }

    fn pairs(space: &SweepSpace, repeat: usize) -> Vec<(i64, i64)> {
        Sweeper::new(space, repeat)
            .iter()
            .map(|c| (c.get_int("a").unwrap(), c.get_int("b").unwrap()))
            .collect()
    }

    #[test]
    fn enumeration_order_last_key_fastest() {
        let space = flat_space();
        assert_eq!(pairs(&space, 1), vec![(1, 10), (1, 20), (2, 10), (2, 20)]);
    }

    #[test]
    fn nested_leaves_vary_independently() {
        let space = SweepSpace::new()
            .add_ints("a", [1, 2])
            .add_nested("nested", SweepSpace::new().add_ints("c", [5, 6]));

        let configs: Vec<ConcreteConfig> = Sweeper::new(&space, 1).iter().collect();
        assert_eq!(configs.len(), 4);

        let resolved: Vec<(i64, i64)> = configs
            .iter()
            .map(|c| {
                (
                    c.get_int("a").unwrap(),
                    c.get_nested("nested").unwrap().get_int("c").unwrap(),
                )
            })
            .collect();
        assert_eq!(resolved, vec![(1, 5), (1, 6), (2, 5), (2, 6)]);
    }

    #[test]
    fn length_is_product_of_leaf_lengths() {
        let space = SweepSpace::new()
            .add_ints("a", [1, 2, 3])
            .add_strs("b", ["x", "y"])
            .add_nested(
                "sub",
                SweepSpace::new().add_floats("c", [0.1, 0.2]).add_bools("d", [true, false]),
            );

        let sweeper = Sweeper::new(&space, 1);
        assert_eq!(sweeper.total(), Some(24));
        assert_eq!(sweeper.iter().count(), 24);
    }

    #[test]
    fn repeat_re_enumerates_identically() {
        let space = SweepSpace::new().add_ints("a", [1]);
        let configs: Vec<ConcreteConfig> = Sweeper::new(&space, 3).iter().collect();
        assert_eq!(configs.len(), 3);
        for config in &configs {
            assert_eq!(config.get_int("a"), Some(1));
        }

        let space = flat_space();
        let twice = pairs(&space, 2);
        let once = pairs(&space, 1);
        assert_eq!(twice.len(), 8);
        assert_eq!(&twice[..4], &once[..]);
        assert_eq!(&twice[4..], &once[..]);
    }

    #[test]
    fn iteration_is_idempotent() {
        let space = SweepSpace::new()
            .add_floats("lr", [1e-3, 1e-2, 1e-1])
            .add_ints("layers", [2, 4]);
        let sweeper = Sweeper::new(&space, 2);

        let first: Vec<ConcreteConfig> = sweeper.iter().collect();
        let second: Vec<ConcreteConfig> = sweeper.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn partial_consumption_then_restart() {
        let space = flat_space();
        let sweeper = Sweeper::new(&space, 1);

        let mut it = sweeper.iter();
        let head = it.next().unwrap();
        drop(it);

        let restarted = sweeper.iter().next().unwrap();
        assert_eq!(head, restarted);
    }

    #[test]
    fn empty_space_yields_one_empty_config() {
        // The empty Cartesian product is the unit element: one empty
        // configuration per round.
        let space = SweepSpace::new();
        let configs: Vec<ConcreteConfig> = Sweeper::new(&space, 1).iter().collect();
        assert_eq!(configs.len(), 1);
        assert!(configs[0].is_empty());

        assert_eq!(Sweeper::new(&space, 3).iter().count(), 3);
    }

    #[test]
    fn empty_candidate_leaf_yields_nothing() {
        let space = SweepSpace::new()
            .add_ints("a", [1, 2])
            .add_values("b", Vec::<ParamValue>::new());
        assert_eq!(Sweeper::new(&space, 5).iter().count(), 0);
    }

    #[test]
    fn zero_repeat_yields_nothing() {
        let space = flat_space();
        assert_eq!(Sweeper::new(&space, 0).iter().count(), 0);
    }

    #[test]
    fn for_loop_over_sweeper_reference() {
        let space = flat_space();
        let sweeper = Sweeper::new(&space, 1);
        let mut seen = 0;
        for config in &sweeper {
            assert!(config.get_int("a").is_some());
            seen += 1;
        }
        assert_eq!(seen, 4);
    }

    #[test]
    fn pinned_space_enumerates_back_to_its_config() {
        let space = flat_space();
        let original = Sweeper::new(&space, 1).iter().nth(2).unwrap();

        let pinned = SweepSpace::pinned(&original);
        let configs: Vec<ConcreteConfig> = Sweeper::new(&pinned, 1).iter().collect();
        assert_eq!(configs, vec![original]);
    }

    #[test]
    fn json_defined_space_enumerates_in_sorted_key_order() {
        let raw = serde_json::json!({
            "b": [10, 20],
            "a": [1, 2]
        });
        let space = SweepSpace::from_json(&raw).unwrap();
        // serde_json maps iterate sorted, so "a" is still the slow key.
        assert_eq!(pairs(&space, 1), vec![(1, 10), (1, 20), (2, 10), (2, 20)]);
    }
}
