use super::{Args, PureImplementation};
use crate::{Builtin, Error, Value};

/// `abs(x)`
#[derive(Clone, Copy, Debug, Default)]
pub struct Abs;

impl PureImplementation for Abs {
    fn builtin(&self) -> Builtin {
        Builtin::Abs
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        Args::new(Builtin::Abs, args, 1, 1)?.required().abs()
    }
}

/// `chr(i)`: the one-character string with code `i`, for `0 <= i < 256`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Chr;

impl PureImplementation for Chr {
    fn builtin(&self) -> Builtin {
        Builtin::Chr
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let mut args = Args::new(Builtin::Chr, args, 1, 1)?;
        let value = args.required();
        let code = args.int(&value)?;
        u8::try_from(code)
            .map(|byte| Value::Str(char::from(byte).to_string()))
            .map_err(|_| Error::Value(String::from("chr() arg not in range(256)")))
    }
}

/// `len(s)`
#[derive(Clone, Copy, Debug, Default)]
pub struct Len;

impl PureImplementation for Len {
    fn builtin(&self) -> Builtin {
        Builtin::Len
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let value = Args::new(Builtin::Len, args, 1, 1)?.required();
        value.len().map(Value::Int)
    }
}

/// `max(a, b)`: `b` if `a < b`, otherwise `a`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Max;

impl PureImplementation for Max {
    fn builtin(&self) -> Builtin {
        Builtin::Max
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let mut args = Args::new(Builtin::Max, args, 2, 2)?;
        let (a, b) = (args.required(), args.required());
        Ok(if a.lt(&b) { b } else { a })
    }
}

/// `min(a, b)`: `a` if `a < b`, otherwise `b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Min;

impl PureImplementation for Min {
    fn builtin(&self) -> Builtin {
        Builtin::Min
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let mut args = Args::new(Builtin::Min, args, 2, 2)?;
        let (a, b) = (args.required(), args.required());
        Ok(if a.lt(&b) { a } else { b })
    }
}

/// `ord(c)`: the code point of a one-character string.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ord;

impl PureImplementation for Ord {
    fn builtin(&self) -> Builtin {
        Builtin::Ord
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let value = Args::new(Builtin::Ord, args, 1, 1)?.required();
        if value.len()? != 1 {
            return Err(Error::Type(String::from("ord() expected a character")));
        }
        match &value {
            Value::Str(s) => s
                .chars()
                .next()
                .map(|c| Value::Int(i64::from(u32::from(c))))
                .ok_or_else(|| Error::Type(String::from("ord() expected a character"))),
            other => Err(Error::Type(format!(
                "ord() expected string of length 1, but {} found",
                other.type_name()
            ))),
        }
    }
}
