//! Pure implementations of the builtins that the host does not provide natively.

use crate::{Builtin, Error, Value};

mod iterable;
pub use iterable::{All, Any, Reduce, Reversed};
mod range;
pub use range::{Range, XRange};
mod scalar;
pub use scalar::{Abs, Chr, Len, Max, Min, Ord};
mod sum;
pub use sum::Sum;

/// A replacement for a builtin operation.
///
/// Implementations must behave observably like the builtin they replace for every
/// input type they support, including the error raised on bad input.
pub trait PureImplementation: Send + Sync {
    /// The builtin this implementation replaces.
    fn builtin(&self) -> Builtin;

    /// Invokes the implementation with positional arguments.
    fn call(&self, args: Vec<Value>) -> Result<Value, Error>;
}

/// Positional arguments of a call, checked against the builtin's arity.
pub(crate) struct Args {
    builtin: Builtin,
    values: std::vec::IntoIter<Value>,
    /// Arguments still guaranteed present by the arity check.
    required: usize,
}

impl Args {
    /// Fails with [`Error::Arity`] unless `min <= values.len() <= max`.
    pub fn new(builtin: Builtin, values: Vec<Value>, min: usize, max: usize) -> Result<Self, Error> {
        let got = values.len();
        if got < min || got > max {
            return Err(Error::Arity {
                builtin,
                min,
                max,
                got,
            });
        }
        Ok(Self {
            builtin,
            values: values.into_iter(),
            required: min,
        })
    }

    /// The next argument, which the arity check guarantees is present.
    ///
    /// Must be called at most `min` times, before any [`optional`](Self::optional).
    pub fn required(&mut self) -> Value {
        debug_assert!(
            self.required > 0,
            "{}() read more required arguments than its minimum arity",
            self.builtin
        );
        self.required = self.required.saturating_sub(1);
        self.values.next().unwrap_or(Value::None)
    }

    /// The next argument, if the caller passed it.
    pub fn optional(&mut self) -> Option<Value> {
        self.values.next()
    }

    /// Converts an argument to an integer, naming the builtin on failure.
    pub fn int(&self, value: &Value) -> Result<i64, Error> {
        value.as_int().ok_or_else(|| {
            Error::Type(format!(
                "{}() integer argument expected, got {}",
                self.builtin,
                value.type_name()
            ))
        })
    }
}
