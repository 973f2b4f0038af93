use super::{Args, PureImplementation};
use crate::{Builtin, Error, Value};
use kiln_sequence::{xrange, Generator};

/// Resolves `(first, second, increment)` the way `range` and `xrange` do.
///
/// Omitted trailing arguments and explicit `None`s both take their defaults.
fn progression(builtin: Builtin, args: Vec<Value>) -> Result<kiln_sequence::Range, Error> {
    let mut args = Args::new(builtin, args, 1, 3)?;
    let first = args.required();
    let first = args.int(&first)?;
    let optional = |args: &mut Args| -> Result<Option<i64>, Error> {
        match args.optional() {
            None | Some(Value::None) => Ok(None),
            Some(value) => args.int(&value).map(Some),
        }
    };
    let second = optional(&mut args)?;
    let increment = optional(&mut args)?;
    Ok(xrange(first, second, increment)?)
}

/// `range([start,] stop[, step])`: the progression as a list.
#[derive(Clone, Copy, Debug, Default)]
pub struct Range;

impl PureImplementation for Range {
    fn builtin(&self) -> Builtin {
        Builtin::Range
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let range = progression(Builtin::Range, args)?;
        Ok(Value::List(range.iter().map(Value::Int).collect()))
    }
}

/// `xrange([start,] stop[, step])`: the progression as a lazy, splittable value.
#[derive(Clone, Copy, Debug, Default)]
pub struct XRange;

impl PureImplementation for XRange {
    fn builtin(&self) -> Builtin {
        Builtin::Xrange
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        progression(Builtin::Xrange, args).map(Value::XRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Int).collect()
    }

    #[test_case(&[5] => ints(&[0, 1, 2, 3, 4]); "stop only")]
    #[test_case(&[2, 5] => ints(&[2, 3, 4]); "start and stop")]
    #[test_case(&[0, 10, 2] => ints(&[0, 2, 4, 6, 8]); "step")]
    #[test_case(&[5, 2, -1] => ints(&[5, 4, 3]); "negative step")]
    #[test_case(&[0, 10, -1] => ints(&[]); "wrong direction")]
    #[test_case(&[-3] => ints(&[]); "negative stop")]
    #[test_case(&[1, 8, 3] => ints(&[1, 4, 7]); "uneven step")]
    fn test_range(args: &[i64]) -> Vec<Value> {
        match Range.call(ints(args)).unwrap() {
            Value::List(items) => items,
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_xrange_is_lazy() {
        let value = XRange
            .call(vec![Value::Int(0), Value::Int(i64::MAX)])
            .unwrap();
        let Value::XRange(range) = value else {
            panic!("expected xrange");
        };
        assert_eq!(range.len(), i64::MAX as u64);
        assert_eq!(range.start(), 0);
        assert!(range.can_split());
    }

    #[test]
    fn test_xrange_none_arguments_take_defaults() {
        let value = XRange
            .call(vec![Value::Int(3), Value::None, Value::None])
            .unwrap();
        assert_eq!(value.iter().unwrap().collect::<Vec<_>>(), ints(&[0, 1, 2]));
    }

    #[test]
    fn test_zero_increment() {
        for builtin in [&Range as &dyn PureImplementation, &XRange] {
            assert_eq!(
                builtin.call(ints(&[0, 10, 0])),
                Err(Error::Sequence(kiln_sequence::Error::ZeroIncrement))
            );
        }
    }

    #[test]
    fn test_argument_errors() {
        assert!(matches!(XRange.call(vec![]), Err(Error::Arity { got: 0, .. })));
        assert!(matches!(
            XRange.call(ints(&[1, 2, 3, 4])),
            Err(Error::Arity { got: 4, .. })
        ));
        assert_eq!(
            XRange.call(vec![Value::from("3")]),
            Err(Error::Type(String::from(
                "xrange() integer argument expected, got str"
            )))
        );
        assert_eq!(
            Range.call(vec![Value::Int(0), Value::Float(2.0)]),
            Err(Error::Type(String::from(
                "range() integer argument expected, got float"
            )))
        );
    }
}
