//! Core types for detection results.

use serde::{Deserialize, Serialize};

/// Identifiers for the built-in detectors, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    #[serde(rename = "range_loop")]
    RangeLoop,
    #[serde(rename = "long_function")]
    LongFunction,
    #[serde(rename = "too_many_parameters")]
    TooManyParameters,
    #[serde(rename = "mutable_default")]
    MutableDefault,
    #[serde(rename = "deep_nesting")]
    DeepNesting,
    #[serde(rename = "missing_function_docstring")]
    MissingFunctionDocstring,
    #[serde(rename = "missing_class_docstring")]
    MissingClassDocstring,
    #[serde(rename = "print_call")]
    PrintCall,
}

impl Rule {
    /// Every rule, in the order detectors run against a node.
    pub const ALL: [Rule; 8] = [
        Rule::RangeLoop,
        Rule::LongFunction,
        Rule::TooManyParameters,
        Rule::MutableDefault,
        Rule::DeepNesting,
        Rule::MissingFunctionDocstring,
        Rule::MissingClassDocstring,
        Rule::PrintCall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::RangeLoop => "range_loop",
            Rule::LongFunction => "long_function",
            Rule::TooManyParameters => "too_many_parameters",
            Rule::MutableDefault => "mutable_default",
            Rule::DeepNesting => "deep_nesting",
            Rule::MissingFunctionDocstring => "missing_function_docstring",
            Rule::MissingClassDocstring => "missing_class_docstring",
            Rule::PrintCall => "print_call",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Rule::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// One-line summary for `pyreview rules`.
    pub fn description(&self) -> &'static str {
        match self {
            Rule::RangeLoop => "for-loops iterating over range(...)",
            Rule::LongFunction => "functions with too many body statements",
            Rule::TooManyParameters => "functions with too many positional parameters",
            Rule::MutableDefault => "list, dict or set literals as parameter defaults",
            Rule::DeepNesting => "if/for/while/try/with blocks nested too deeply",
            Rule::MissingFunctionDocstring => "functions without a docstring",
            Rule::MissingClassDocstring => "classes without a docstring",
            Rule::PrintCall => "calls to print()",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A human-readable description of one detected issue.
///
/// Advisories carry no severity; two advisories are the same issue when
/// their text is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Advisory(String);

impl Advisory {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Advisory {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for Advisory {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_names_round_trip() {
        for rule in Rule::ALL {
            assert_eq!(Rule::parse(rule.as_str()), Some(rule));
        }
        assert_eq!(Rule::parse("no_such_rule"), None);
    }

    #[test]
    fn test_rule_serde_uses_snake_case_names() {
        let yaml = serde_yaml::to_string(&Rule::MissingClassDocstring).unwrap();
        assert_eq!(yaml.trim(), "missing_class_docstring");
    }

    #[test]
    fn test_advisory_serializes_as_plain_string() {
        let advisory = Advisory::new("Consider refactoring.");
        assert_eq!(
            serde_json::to_string(&advisory).unwrap(),
            "\"Consider refactoring.\""
        );
    }
}
