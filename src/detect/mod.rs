//! Detection of style and structural issues in a parsed snippet.

mod aggregate;
mod rules;
mod runner;
mod types;

pub use aggregate::{Suggestions, NO_SUGGESTION};
pub use rules::{
    detectors, DeepNesting, Detector, LongFunction, MissingClassDocstring,
    MissingFunctionDocstring, MutableDefault, PrintCall, RangeLoop, TooManyParameters,
    PRINT_CALL_MESSAGE, RANGE_LOOP_MESSAGE,
};
pub use runner::RuleEngine;
pub use types::{Advisory, Rule};
