use super::{Args, PureImplementation};
use crate::{Builtin, Error, Value};
use kiln_sequence::Generator;

/// `all(iterable)`: whether every element is truthy (stops at the first falsy one).
#[derive(Clone, Copy, Debug, Default)]
pub struct All;

impl PureImplementation for All {
    fn builtin(&self) -> Builtin {
        Builtin::All
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let iterable = Args::new(Builtin::All, args, 1, 1)?.required();
        if iterable.len()? == 0 {
            return Ok(Value::Bool(true));
        }
        let mut elements = iterable.iter()?;
        Ok(Value::Bool(elements.all(|value| value.truthy())))
    }
}

/// `any(iterable)`: whether some element is truthy (stops at the first truthy one).
#[derive(Clone, Copy, Debug, Default)]
pub struct Any;

impl PureImplementation for Any {
    fn builtin(&self) -> Builtin {
        Builtin::Any
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let iterable = Args::new(Builtin::Any, args, 1, 1)?.required();
        if iterable.len()? == 0 {
            return Ok(Value::Bool(false));
        }
        let mut elements = iterable.iter()?;
        Ok(Value::Bool(elements.any(|value| value.truthy())))
    }
}

/// `reduce(function, sequence)`: left fold seeded with the first element.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reduce;

impl PureImplementation for Reduce {
    fn builtin(&self) -> Builtin {
        Builtin::Reduce
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let mut args = Args::new(Builtin::Reduce, args, 2, 2)?;
        let (function, sequence) = (args.required(), args.required());
        let function = match function {
            Value::Function(function) => function,
            other => {
                return Err(Error::Type(format!(
                    "'{}' object is not callable",
                    other.type_name()
                )))
            }
        };

        let mut elements = sequence.iter()?;
        let first = elements.next().ok_or_else(|| {
            Error::Type(String::from(
                "reduce() of empty sequence with no initial value",
            ))
        })?;
        elements.try_fold(first, |acc, value| function.call(vec![acc, value]))
    }
}

/// `reversed(sequence)`: the elements of a sized sequence, last first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reversed;

impl PureImplementation for Reversed {
    fn builtin(&self) -> Builtin {
        Builtin::Reversed
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let sequence = Args::new(Builtin::Reversed, args, 1, 1)?.required();
        match sequence {
            Value::List(mut items) => {
                items.reverse();
                Ok(Value::List(items))
            }
            Value::XRange(range) => {
                let reversed = range.reversed().ok_or_else(|| {
                    Error::Overflow(String::from("reversed() increment is too large"))
                })?;
                Ok(Value::List(reversed.iter().map(Value::Int).collect()))
            }
            other => {
                let mut items = other.iter()?.collect::<Vec<_>>();
                items.reverse();
                Ok(Value::List(items))
            }
        }
    }
}
