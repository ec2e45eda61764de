//! `--flag value` parsing shared by the receipt commands.

use std::collections::{HashMap, HashSet};

use crate::cli::core::CommandError;

#[derive(Debug, Default)]
pub struct ParsedArgs {
    positional: Vec<String>,
    values: HashMap<String, String>,
    switches: HashSet<String>,
}

impl ParsedArgs {
    /// Splits `args` into positionals, `--name value` (or `--name=value`) pairs
    /// drawn from `value_flags`, and bare `switches`.
    pub fn parse(
        args: &[&str],
        value_flags: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(flag) = arg.strip_prefix("--") else {
                parsed.positional.push(arg.to_string());
                continue;
            };
            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (flag, None),
            };
            if value_flags.iter().any(|flag| *flag == name) {
                let value = match inline {
                    Some(value) => value.to_string(),
                    None => iter.next().map(|value| value.to_string()).ok_or_else(|| {
                        CommandError::InvalidArguments(format!("`--{name}` needs a value"))
                    })?,
                };
                parsed.values.insert(name.to_string(), value);
            } else if switches.iter().any(|flag| *flag == name) && inline.is_none() {
                parsed.switches.insert(name.to_string());
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{name}`"
                )));
            }
        }
        Ok(parsed)
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn has(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }
}

/// Splits `field=value` into its parts.
pub fn split_assignment(raw: &str) -> Result<(&str, &str), CommandError> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim(), value))
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected `field=value`, got `{raw}`"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_values_switches_and_positionals() {
        let parsed = ParsedArgs::parse(
            &["jaya", "--category", "food", "--out=/tmp/x.csv", "--yes"],
            &["category", "out"],
            &["yes"],
        )
        .unwrap();
        assert_eq!(parsed.positional(), ["jaya".to_string()]);
        assert_eq!(parsed.value("category"), Some("food"));
        assert_eq!(parsed.value("out"), Some("/tmp/x.csv"));
        assert!(parsed.has("yes"));
        assert!(!parsed.has("all"));
    }

    #[test]
    fn rejects_unknown_flags_and_missing_values() {
        assert!(matches!(
            ParsedArgs::parse(&["--bogus"], &["store"], &[]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            ParsedArgs::parse(&["--store"], &["store"], &[]),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn assignments_keep_empty_values() {
        assert_eq!(split_assignment("notes=").unwrap(), ("notes", ""));
        assert_eq!(split_assignment("store=A=B").unwrap(), ("store", "A=B"));
        assert!(split_assignment("total").is_err());
    }
}
