//! Dynamically typed values passed to and returned from pure implementations.

use crate::Error;
use core::{cmp::Ordering, fmt};
use kiln_sequence::{Generator, Range};
use std::sync::Arc;

type Callable = dyn Fn(Vec<Value>) -> Result<Value, Error> + Send + Sync;

/// A callable value (for example, the function argument of `reduce`).
///
/// Clones share the underlying closure; two functions are equal only if they
/// share it.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    f: Arc<Callable>,
}

impl Function {
    /// Wraps `f` under the given display name.
    pub fn new<F>(name: &str, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            f: Arc::new(f),
        }
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the underlying closure.
    fn address(&self) -> usize {
        Arc::as_ptr(&self.f) as *const () as usize
    }

    /// Invokes the function.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        (self.f)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

/// A dynamically typed value.
#[derive(Clone, Debug)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// A lazy arithmetic progression, as produced by `xrange`.
    XRange(Range),
    Function(Function),
}

/// Numeric view of a value, with `bool` promoted to `int`.
#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Name of the value's type, as reported in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::XRange(_) => "xrange",
            Self::Function(_) => "function",
        }
    }

    /// Truthiness: zero, empty, and `None` are false.
    pub fn truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::XRange(range) => !range.is_empty(),
            Self::Function(_) => true,
        }
    }

    /// The integer value of an `int` or `bool`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            Self::Float(f) => Some(Number::Float(*f)),
            other => other.as_int().map(Number::Int),
        }
    }

    /// Number of elements of a sized value.
    pub fn len(&self) -> Result<i64, Error> {
        let len = match self {
            Self::Str(s) => s.chars().count() as u64,
            Self::List(items) => items.len() as u64,
            Self::XRange(range) => range.len(),
            other => {
                return Err(Error::Type(format!(
                    "object of type '{}' has no len()",
                    other.type_name()
                )))
            }
        };
        i64::try_from(len)
            .map_err(|_| Error::Overflow(String::from("len() result is too large")))
    }

    /// Iterates the elements of an iterable value.
    ///
    /// Strings yield one-character strings; ranges yield integers lazily.
    pub fn iter(&self) -> Result<Box<dyn Iterator<Item = Value> + '_>, Error> {
        match self {
            Self::Str(s) => Ok(Box::new(s.chars().map(|c| Self::Str(c.to_string())))),
            Self::List(items) => Ok(Box::new(items.iter().cloned())),
            Self::XRange(range) => Ok(Box::new(range.iter().map(Self::Int))),
            other => Err(Error::Type(format!(
                "'{}' object is not iterable",
                other.type_name()
            ))),
        }
    }

    /// Orders two values the way Python 2 does.
    ///
    /// Numbers compare exactly by value across `bool`, `int`, and `float`,
    /// strings and lists lexicographically. Values of different kinds order as
    /// `None`, then numbers, then by type name. Functions and ranges have an
    /// arbitrary but consistent order among themselves.
    ///
    /// Returns `None` when a `NaN` decides the comparison, in which case every
    /// comparison is false.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::List(a), Self::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            (Self::XRange(a), Self::XRange(b)) => Some(
                (a.start(), a.len(), a.increment()).cmp(&(b.start(), b.len(), b.increment())),
            ),
            (Self::Function(a), Self::Function(b)) => Some(a.address().cmp(&b.address())),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.compare(b),
                _ => Some(self.kind().cmp(&other.kind())),
            },
        }
    }

    /// Whether `self < other`.
    pub fn lt(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Less)
    }

    /// Position of the value's type in the cross-type order.
    fn kind(&self) -> (u8, &'static str) {
        match self {
            Self::None => (0, ""),
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => (1, ""),
            other => (2, other.type_name()),
        }
    }

    /// `self + other`.
    pub fn add(self, other: Value) -> Result<Value, Error> {
        match (self, other) {
            (Self::Str(mut a), Self::Str(b)) => {
                a.push_str(&b);
                Ok(Self::Str(a))
            }
            (Self::List(mut a), Self::List(b)) => {
                a.extend(b);
                Ok(Self::List(a))
            }
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(Number::Int(x)), Some(Number::Int(y))) => x
                    .checked_add(y)
                    .map(Self::Int)
                    .ok_or_else(|| Error::Overflow(String::from("integer addition overflowed"))),
                (Some(x), Some(y)) => Ok(Self::Float(x.to_f64() + y.to_f64())),
                _ => Err(Error::Type(format!(
                    "unsupported operand type(s) for +: '{}' and '{}'",
                    a.type_name(),
                    b.type_name()
                ))),
            },
        }
    }

    /// Absolute value of a number.
    pub fn abs(&self) -> Result<Value, Error> {
        match self.as_number() {
            Some(Number::Int(i)) => i
                .checked_abs()
                .map(Self::Int)
                .ok_or_else(|| Error::Overflow(String::from("absolute value overflowed"))),
            Some(Number::Float(f)) => Ok(Self::Float(f.abs())),
            None => Err(Error::Type(format!(
                "bad operand type for abs(): '{}'",
                self.type_name()
            ))),
        }
    }
}

impl Number {
    fn to_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Exact numeric comparison; `None` if either side is `NaN`.
    fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(&b),
            (Self::Int(a), Self::Float(b)) => compare_int_float(a, b),
            (Self::Float(a), Self::Int(b)) => compare_int_float(b, a).map(Ordering::reverse),
        }
    }
}

/// Compares `int` with `float` without rounding `int` to the nearest `f64`.
fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, the first float above every i64.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if float.is_nan() {
        return None;
    }
    let whole = float.trunc();
    if whole >= BOUND {
        return Some(Ordering::Less);
    }
    if whole < -BOUND {
        return Some(Ordering::Greater);
    }
    // `whole` is integral and in [-2^63, 2^63), so the cast is exact.
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&float),
        unequal => Some(unequal),
    }
}

impl PartialEq for Value {
    /// Numbers compare by value across `bool`, `int`, and `float`.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::XRange(a), Self::XRange(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.compare(b) == Some(Ordering::Equal),
                _ => false,
            },
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::None.truthy());
        assert!(!Value::Int(0).truthy());
        assert!(!Value::Float(0.0).truthy());
        assert!(!Value::from("").truthy());
        assert!(!Value::List(vec![]).truthy());
        assert!(!Value::XRange(Range::new(0, 0, 1)).truthy());
        assert!(Value::from(vec![0i64]).truthy());
        assert!(Value::from("0").truthy());
        assert!(Value::Function(Function::new("f", |_| Ok(Value::None))).truthy());
    }

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::Int(1), Value::from("1"));
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn test_add() {
        assert_eq!(Value::Int(2).add(Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(Value::Int(2).add(Value::Float(0.5)).unwrap(), Value::Float(2.5));
        assert_eq!(Value::Bool(true).add(Value::Bool(true)).unwrap(), Value::Int(2));
        assert_eq!(Value::from("ab").add(Value::from("c")).unwrap(), Value::from("abc"));
        assert_eq!(
            Value::from(vec![1i64]).add(Value::from(vec![2i64])).unwrap(),
            Value::from(vec![1i64, 2])
        );
        assert_eq!(
            Value::Int(1).add(Value::from("a")),
            Err(Error::Type(String::from(
                "unsupported operand type(s) for +: 'int' and 'str'"
            )))
        );
        assert!(matches!(
            Value::Int(i64::MAX).add(Value::Int(1)),
            Err(Error::Overflow(_))
        ));
    }

    #[test]
    fn test_ordering() {
        assert!(Value::Int(1).lt(&Value::Float(1.5)));
        assert!(Value::from("abc").lt(&Value::from("abd")));
        assert!(Value::from(vec![1i64, 2]).lt(&Value::from(vec![1i64, 2, 0])));
        assert!(!Value::from(vec![2i64]).lt(&Value::from(vec![1i64, 9])));
    }

    #[test]
    fn test_ordering_across_types() {
        // None < numbers < function < list < str < xrange
        let ascending = [
            Value::None,
            Value::Int(-5),
            Value::Bool(true),
            Value::Float(2.5),
            Value::Function(Function::new("f", |_| Ok(Value::None))),
            Value::from(vec![0i64]),
            Value::from(""),
            Value::XRange(Range::new(0, 1, 1)),
        ];
        for pair in ascending.windows(2) {
            assert!(pair[0].lt(&pair[1]), "{pair:?}");
            assert!(!pair[1].lt(&pair[0]), "{pair:?}");
        }
        assert_eq!(
            Value::Int(i64::MAX).compare(&Value::from("a")),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from(vec![Value::Int(1), Value::None]).compare(&Value::from(vec![1i64, 0])),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_ordering_with_nan_is_false() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan.compare(&Value::Int(0)), None);
        assert!(!nan.lt(&Value::Int(0)));
        assert!(!Value::Int(0).lt(&nan));
        assert!(!Value::from(vec![nan.clone()]).lt(&Value::from(vec![1.0])));
    }

    #[test]
    fn test_int_float_comparison_is_exact() {
        // 2^53 + 1 rounds to 2^53 as a float.
        let big = (1i64 << 53) + 1;
        let float = Value::Float((1i64 << 53) as f64);
        assert_ne!(Value::Int(big), float);
        assert!(float.lt(&Value::Int(big)));
        assert!(!Value::Int(big).lt(&float));
        assert_eq!(Value::Int(1 << 53), float);

        assert!(Value::Int(i64::MAX).lt(&Value::Float(9_223_372_036_854_775_808.0)));
        assert!(Value::Float(-9_223_372_036_854_775_808.0).lt(&Value::Int(i64::MIN + 1)));
        assert_eq!(Value::Int(i64::MIN), Value::Float(-9_223_372_036_854_775_808.0));
        assert!(Value::Int(2).lt(&Value::Float(2.5)));
        assert!(Value::Float(-2.5).lt(&Value::Int(-2)));
        assert!(Value::Int(i64::MAX).lt(&Value::Float(f64::INFINITY)));
        assert!(Value::Float(f64::NEG_INFINITY).lt(&Value::Int(i64::MIN)));
    }

    #[test]
    fn test_len_and_iter() {
        assert_eq!(Value::from("héllo").len().unwrap(), 5);
        assert_eq!(Value::XRange(Range::new(0, 7, 3)).len().unwrap(), 7);
        assert!(Value::Int(3).len().is_err());

        let chars: Vec<Value> = Value::from("ab").iter().unwrap().collect();
        assert_eq!(chars, vec![Value::from("a"), Value::from("b")]);
        let ints: Vec<Value> = Value::XRange(Range::new(5, 3, -1)).iter().unwrap().collect();
        assert_eq!(ints, vec![Value::Int(5), Value::Int(4), Value::Int(3)]);
        assert!(Value::None.iter().is_err());
    }

    #[test]
    fn test_abs() {
        assert_eq!(Value::Int(-4).abs().unwrap(), Value::Int(4));
        assert_eq!(Value::Float(-0.5).abs().unwrap(), Value::Float(0.5));
        assert_eq!(Value::Bool(true).abs().unwrap(), Value::Int(1));
        assert!(matches!(Value::Int(i64::MIN).abs(), Err(Error::Overflow(_))));
        assert_eq!(
            Value::from("x").abs(),
            Err(Error::Type(String::from("bad operand type for abs(): 'str'")))
        );
    }

    #[test]
    fn test_function_identity() {
        let f = Function::new("double", |args| args[0].clone().add(args[0].clone()));
        let g = f.clone();
        assert_eq!(f, g);
        assert_ne!(f, Function::new("double", |args| Ok(args[0].clone())));
        assert_eq!(f.call(vec![Value::Int(4)]).unwrap(), Value::Int(8));
        assert_eq!(format!("{f:?}"), "<function double>");
    }
}
