//! Prefix completion over registered command names.

/// Result of matching a typed prefix against the command set.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    /// First matching name in registration order, if any
    pub first_candidate: Option<&'a str>,
    /// How many characters can be completed safely: the full name length
    /// for a unique match, otherwise the longest common prefix of all
    /// matches
    pub completed_len: usize,
    /// Number of matching names
    pub count: usize,
}

/// Match `prefix` against `names`.
///
/// An empty prefix never matches; completion is only offered once the user
/// has typed something.
pub fn complete<'a, I>(names: I, prefix: &str) -> Completion<'a>
where
    I: Iterator<Item = &'a str>,
{
    let mut result = Completion {
        first_candidate: None,
        completed_len: 0,
        count: 0,
    };
    if prefix.is_empty() {
        return result;
    }

    for name in names {
        if !name.starts_with(prefix) {
            continue;
        }

        if result.count == 0 || name.len() < result.completed_len {
            result.completed_len = name.len();
        }
        result.count += 1;

        match result.first_candidate {
            None => result.first_candidate = Some(name),
            Some(first) => {
                // the prefix itself is known equal, compare past it
                let first = first.as_bytes();
                let name = name.as_bytes();
                for i in prefix.len()..result.completed_len {
                    if first[i] != name[i] {
                        result.completed_len = i;
                        break;
                    }
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    static NAMES: &[&str] = &["help", "get-led", "get-adc", "set"];

    fn run(prefix: &str) -> Completion<'static> {
        complete(NAMES.iter().copied(), prefix)
    }

    #[test]
    fn unique_prefix_completes_to_full_name() {
        let c = run("h");
        assert_eq!(c.count, 1);
        assert_eq!(c.first_candidate, Some("help"));
        assert_eq!(c.completed_len, "help".len());
    }

    #[test]
    fn shared_prefix_completes_to_common_part() {
        let c = run("g");
        assert_eq!(c.count, 2);
        assert_eq!(c.first_candidate, Some("get-led"));
        assert_eq!(c.completed_len, "get-".len());
    }

    #[test]
    fn completed_length_never_exceeds_shortest_candidate() {
        let c = complete(["send", "sendall"].into_iter(), "se");
        assert_eq!(c.count, 2);
        assert_eq!(c.completed_len, "send".len());
    }

    #[test]
    fn divergence_right_after_the_prefix() {
        let c = complete(["beta", "bravo", "brim"].into_iter(), "b");
        assert_eq!(c.count, 3);
        assert_eq!(c.first_candidate, Some("beta"));
        assert_eq!(c.completed_len, 1);
    }

    #[test]
    fn empty_prefix_offers_nothing() {
        let c = run("");
        assert_eq!(c.count, 0);
        assert_eq!(c.first_candidate, None);
    }

    #[test]
    fn unmatched_prefix_offers_nothing() {
        assert_eq!(run("x").count, 0);
    }
}
