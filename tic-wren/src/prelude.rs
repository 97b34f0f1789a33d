//! The `Tic` declaration module every cart is loaded on top of.

/// Declares the foreign `Tic` members plus the `Random`, `Maths` and `Engine`
/// helpers. Interpreted into the cart module before the cart itself.
pub const PRELUDE: &str = include_str!("prelude.wren");

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::foreign::{declarations, method_signature};
    use pretty_assertions::assert_eq;

    fn declared(line: &str) -> Option<String> {
        let decl = line.trim().strip_prefix("foreign static ")?;
        Some(match decl.split_once('(') {
            Some((name, params)) => {
                let params = params.trim_end_matches(')');
                let arity = params.split(',').filter(|p| !p.trim().is_empty()).count();
                method_signature(name, arity)
            }
            None => decl.to_owned(),
        })
    }

    #[test]
    fn declarations_match_the_dispatch_table() {
        let in_prelude: BTreeSet<String> = PRELUDE.lines().filter_map(declared).collect();
        let in_table: BTreeSet<String> = declarations().map(|(sig, _)| sig).collect();
        assert_eq!(in_prelude, in_table);
    }

    #[test]
    fn engine_defaults_are_declared() {
        assert!(PRELUDE.contains("class Engine {"));
        assert!(PRELUDE.contains("scanline(row) {}"));
        assert!(PRELUDE.trim_end().ends_with("Random.init_()"));
    }

    /// Helper signatures carts already call; overloads may be added, never removed.
    #[test]
    fn maths_helpers_keep_their_arities() {
        let helpers: Vec<String> = PRELUDE
            .lines()
            .filter_map(|line| line.trim().strip_prefix("static "))
            .filter_map(|decl| {
                let (name, rest) = decl.split_once('(')?;
                let params = rest.split_once(')')?.0;
                let arity = params.split(',').filter(|p| !p.trim().is_empty()).count();
                Some(method_signature(name, arity))
            })
            .collect();
        for expected in [
            "lerp(_,_,_)",
            "clamp(_,_,_)",
            "clamp_bottom(_,_,_)",
            "clamp_bottom(_,_)",
            "within_range(_,_,_)",
            "sign(_)",
            "sign0(_)",
            "radians(_)",
            "degrees(_)",
        ] {
            assert!(helpers.iter().any(|h| h == expected), "missing Maths.{expected}");
        }
    }
}
