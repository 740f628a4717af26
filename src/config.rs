use core::fmt;
use core::str::FromStr;

/// Construction time settings of a registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub compaction: Compaction,
}

/// When to physically remove entries whose referent is gone.
///
/// Lookups always skip such tombstones. This only decides whether their slots are reclaimed, and
/// thus whether the storage of a key can grow beyond the number of its live entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compaction {
    /// Keep tombstones until `compact` is called explicitly.
    ///
    /// Adding stays amortized constant time but storage grows with every addition.
    Never,
    /// Rebuild the sequence of a key, without tombstones, before each addition to it.
    ///
    /// Storage is bounded by the live entries but adding is linear in their number.
    OnAdd,
}

/// A policy name was not recognized.
#[derive(Debug)]
pub struct ParseCompactionError {
    kind: ParseErrorKind,
}

#[derive(Debug)]
enum ParseErrorKind {
    Empty,
    Unknown(String),
}

impl Config {
    pub fn with_compaction(compaction: Compaction) -> Self {
        Config { compaction }
    }
}

impl Default for Compaction {
    fn default() -> Self {
        Compaction::Never
    }
}

impl FromStr for Compaction {
    type Err = ParseCompactionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();

        if name.is_empty() {
            return Err(ParseCompactionError {
                kind: ParseErrorKind::Empty,
            });
        }

        if name.eq_ignore_ascii_case("never") {
            Ok(Compaction::Never)
        } else if name.eq_ignore_ascii_case("on-add") || name.eq_ignore_ascii_case("on_add") {
            Ok(Compaction::OnAdd)
        } else {
            Err(ParseCompactionError {
                kind: ParseErrorKind::Unknown(name.to_owned()),
            })
        }
    }
}

impl fmt::Display for Compaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Compaction::Never => f.write_str("never"),
            Compaction::OnAdd => f.write_str("on-add"),
        }
    }
}

impl fmt::Display for ParseCompactionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::Empty => f.write_str("empty compaction policy"),
            ParseErrorKind::Unknown(name) => write!(
                f,
                "unknown compaction policy `{}`, expected `never` or `on-add`",
                name
            ),
        }
    }
}

impl std::error::Error for ParseCompactionError {}

#[test]
fn parse_policy_names() {
    assert_eq!("never".parse::<Compaction>().unwrap(), Compaction::Never);
    assert_eq!(" On-Add ".parse::<Compaction>().unwrap(), Compaction::OnAdd);
    assert_eq!("on_add".parse::<Compaction>().unwrap(), Compaction::OnAdd);

    let err = "sometimes".parse::<Compaction>().unwrap_err();
    assert!(err.to_string().contains("sometimes"));
    assert!("".parse::<Compaction>().is_err());
}

#[test]
fn display_roundtrips_through_parse() {
    for policy in [Compaction::Never, Compaction::OnAdd].iter() {
        assert_eq!(policy.to_string().parse::<Compaction>().unwrap(), *policy);
    }
}
