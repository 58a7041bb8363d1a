//! First-success combinator for ordered fallback chains
//!
//! Each tier is a plain function over a shared input, so every tier can be
//! unit-tested on its own and the chain order is visible as data.

use tracing::trace;

/// One named step of a fallback chain
pub struct Tier<I: ?Sized, T> {
    pub name: &'static str,
    pub run: fn(&I) -> Option<T>,
}

impl<I: ?Sized, T> Tier<I, T> {
    pub const fn new(name: &'static str, run: fn(&I) -> Option<T>) -> Self {
        Self { name, run }
    }
}

/// Run `tiers` in order and return the first `Some`
pub fn first_success<I: ?Sized, T>(input: &I, tiers: &[Tier<I, T>]) -> Option<T> {
    tiers.iter().find_map(|tier| {
        let found = (tier.run)(input);
        if found.is_some() {
            trace!("fallback tier '{}' matched", tier.name);
        }
        found
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &str) -> Option<usize> {
        None
    }

    fn length(input: &str) -> Option<usize> {
        Some(input.len())
    }

    fn panics(_: &str) -> Option<usize> {
        panic!("later tiers must not run")
    }

    #[test]
    fn test_first_success_short_circuits() {
        let tiers = [Tier::new("never", never), Tier::new("length", length), Tier::new("panics", panics)];
        assert_eq!(first_success("abc", &tiers), Some(3));
    }

    #[test]
    fn test_all_tiers_missing() {
        let tiers = [Tier::new("never", never)];
        assert_eq!(first_success("abc", &tiers), None);
    }
}
