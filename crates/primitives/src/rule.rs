//! This module contains the [Rule] type as well as the [chain_rules] macro for applying rules on
//! top of one another. The first rule to fail short-circuits the chain.

/// A [Rule] validates a value, passing it through on success.
pub type Rule<'a, T, E> = Box<dyn Fn(T) -> Result<T, E> + 'a>;

/// Applies a sequence of rules to a value, returning the value if every rule passes or the error
/// of the first rule that fails.
#[macro_export]
macro_rules! chain_rules {
    ($state:expr, $($rule:expr),+) => {{
        let mut result = Ok($state);

        $(
            result = match result {
                Ok(val) => $rule(val),
                err @ Err(_) => err,
            };
        )+

        result
    }};
}
