use super::{Args, PureImplementation};
use crate::{Builtin, Error, Value};
use kiln_parallel::Strategy;
use kiln_sequence::{reduce, Elements, Generator};
use tracing::trace;

/// `sum(sequence[, start])`, computed with the depth-bounded reducer.
///
/// `xrange` arguments are reduced by splitting the progression itself; other
/// iterables are materialized once and split by index. Element additions that
/// fail are carried through the reduction as `Err` and returned to the caller.
#[derive(Clone, Debug)]
pub struct Sum<S> {
    strategy: S,
    config: reduce::Config,
}

impl<S: Strategy> Sum<S> {
    /// Creates a `sum` that runs the halves of each split with `strategy`.
    pub fn new(strategy: S, config: reduce::Config) -> Self {
        Self { strategy, config }
    }
}

fn add(left: Result<Value, Error>, right: Result<Value, Error>) -> Result<Value, Error> {
    left?.add(right?)
}

impl<S: Strategy> PureImplementation for Sum<S> {
    fn builtin(&self) -> Builtin {
        Builtin::Sum
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let mut args = Args::new(Builtin::Sum, args, 1, 2)?;
        let sequence = args.required();
        let start = args.optional().unwrap_or(Value::Int(0));
        if let Value::Str(_) = start {
            return Err(Error::Type(String::from(
                "sum() can't sum strings [use ''.join(seq) instead]",
            )));
        }

        match sequence {
            Value::XRange(range) => {
                trace!(len = range.len(), "summing xrange");
                let values = range.map(|i| Ok::<Value, Error>(Value::Int(i)));
                reduce::reduce(&self.strategy, values, Ok(start), add, &self.config)
            }
            Value::List(items) => {
                trace!(len = items.len(), "summing list");
                let values = Elements::from(items).map(Ok::<Value, Error>);
                reduce::reduce(&self.strategy, values, Ok(start), add, &self.config)
            }
            other => {
                let items: Vec<Value> = other.iter()?.collect();
                let values = Elements::from(items).map(Ok::<Value, Error>);
                reduce::reduce(&self.strategy, values, Ok(start), add, &self.config)
            }
        }
    }
}
