//! `LOOKOUT_*` value validation
//!
//! A bad value never aborts startup: the previous setting is kept and a
//! warning names the variable, the rejected value and, for near misses, the
//! closest valid spelling.

use std::fmt;

use tracing::warn;

/// A rejected environment value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnvValue {
    pub var: String,
    pub value: String,
    pub suggestion: Option<String>,
    pub expected: Vec<String>,
}

impl fmt::Display for InvalidEnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} value '{}'", self.var, self.value)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        write!(f, "; expected one of: {}", self.expected.join(", "))
    }
}

/// Parses one environment variable against its accepted spellings
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Run `parser`, describing the failure when it rejects `value`
    pub fn check<T, F>(&self, value: &str, parser: F) -> Result<T, InvalidEnvValue>
    where
        F: Fn(&str) -> Option<T>,
    {
        parser(value).ok_or_else(|| InvalidEnvValue {
            var: self.var_name.to_string(),
            value: value.to_string(),
            suggestion: closest(&value.trim().to_lowercase(), self.valid_values, 2)
                .map(str::to_string),
            expected: self.valid_values.iter().map(|v| v.to_string()).collect(),
        })
    }

    /// `check`, keeping `current` and logging a warning on rejection
    pub fn parse<T, F>(&self, value: &str, parser: F, current: T) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        self.check(value, parser).unwrap_or_else(|invalid| {
            warn!("{}", invalid);
            current
        })
    }
}

/// Closest candidate within `max_distance` edits, excluding exact matches
pub fn closest<'c>(input: &str, candidates: &[&'c str], max_distance: usize) -> Option<&'c str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein(input, candidate)))
        .filter(|&(_, distance)| distance > 0 && distance <= max_distance)
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Edit distance over chars, single-row
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKENDS: &[&str] = &["auto", "native", "polling"];

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("polling", "polling"), 0);
        assert_eq!(levenshtein("poling", "polling"), 1);
        assert_eq!(levenshtein("natve", "native"), 1);
        assert_eq!(levenshtein("", "auto"), 4);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_closest_ignores_exact_and_distant() {
        assert_eq!(closest("poling", BACKENDS, 2), Some("polling"));
        assert_eq!(closest("polling", BACKENDS, 2), None);
        assert_eq!(closest("kqueue-fsevents", BACKENDS, 2), None);
    }

    #[test]
    fn test_valid_value_is_parsed() {
        let validator = EnvVarValidator::new("LOOKOUT_BACKEND", BACKENDS);
        let result = validator.parse("native", |s| (s == "native").then_some(1), 0);
        assert_eq!(result, 1);
    }

    #[test]
    fn test_invalid_value_keeps_current() {
        let validator = EnvVarValidator::new("LOOKOUT_BACKEND", BACKENDS);
        assert_eq!(validator.parse("bogus", |_| None::<u8>, 7), 7);
    }

    #[test]
    fn test_rejection_message_suggests() {
        let validator = EnvVarValidator::new("LOOKOUT_BACKEND", BACKENDS);
        let invalid = validator.check("Poling", |_| None::<u8>).unwrap_err();

        assert_eq!(invalid.suggestion.as_deref(), Some("polling"));
        assert_eq!(
            invalid.to_string(),
            "invalid LOOKOUT_BACKEND value 'Poling' (did you mean 'polling'?); \
             expected one of: auto, native, polling"
        );
    }

    #[test]
    fn test_no_suggestion_for_distant_value() {
        let validator = EnvVarValidator::new("LOOKOUT_BACKEND", BACKENDS);
        let invalid = validator.check("kqueue-fsevents", |_| None::<u8>).unwrap_err();
        assert!(invalid.suggestion.is_none());
        assert!(!invalid.to_string().contains("did you mean"));
    }
}
