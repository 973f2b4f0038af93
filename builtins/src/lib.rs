//! Pure implementations of builtin operations and the table that substitutes them.
//!
//! An external host rewrites references to builtins in user code. For each
//! [`Builtin`], the [`Table`] says whether the host provides the operation natively
//! (`None`) or whether it must be replaced by one of the [`PureImplementation`]s in
//! [`pure`]. Pure implementations operate on dynamically typed [`Value`]s and report
//! failures as the [`Error`] the corresponding builtin would raise.
//!
//! `sum` is implemented with the depth-bounded reducer from [`kiln_sequence`], so
//! summing an `xrange` splits the progression instead of walking it.
//!
//! # Example
//!
//! ```
//! use kiln_builtins::{Builtin, Table, Value};
//! use kiln_parallel::Sequential;
//! use kiln_sequence::reduce;
//!
//! let table = Table::standard(Sequential, reduce::Config::default());
//! let xrange = table.get(Builtin::Xrange).unwrap();
//! let sum = table.lookup("sum").unwrap().unwrap();
//!
//! let evens = xrange.call(vec![Value::Int(0), Value::Int(10), Value::Int(2)]).unwrap();
//! assert_eq!(sum.call(vec![evens, Value::Int(100)]).unwrap(), Value::Int(120));
//!
//! // The host implements `hash` natively.
//! assert!(table.get(Builtin::Hash).is_none());
//! ```

use thiserror::Error;

mod builtin;
pub use builtin::Builtin;
pub mod pure;
pub use pure::PureImplementation;
mod table;
pub use table::Table;
mod value;
pub use value::{Function, Value};

/// Errors raised by pure implementations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("TypeError: {0}")]
    Type(String),
    #[error("ValueError: {0}")]
    Value(String),
    #[error("TypeError: {builtin}() takes {} arguments ({got} given)", expected(.min, .max))]
    Arity {
        builtin: Builtin,
        min: usize,
        max: usize,
        got: usize,
    },
    #[error("OverflowError: {0}")]
    Overflow(String),
    #[error("unknown builtin: {0}")]
    UnknownBuiltin(String),
    #[error("ValueError: {0}")]
    Sequence(#[from] kiln_sequence::Error),
}

fn expected(min: &usize, max: &usize) -> String {
    if min == max {
        format!("exactly {min}")
    } else {
        format!("from {min} to {max}")
    }
}
