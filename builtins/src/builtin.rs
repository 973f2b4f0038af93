//! Names of the builtin operations known to the substitution table.

use crate::Error;
use core::{fmt, str::FromStr};

macro_rules! builtins {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// A builtin operation, identified by its name in user code.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Builtin {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl Builtin {
            /// Every builtin, in alphabetical order of name.
            pub const ALL: &'static [Builtin] = &[$(Builtin::$variant),*];

            /// The name of the builtin in user code.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Builtin::$variant => $name,)*
                }
            }
        }

        impl FromStr for Builtin {
            type Err = Error;

            fn from_str(name: &str) -> Result<Self, Error> {
                match name {
                    $($name => Ok(Builtin::$variant),)*
                    _ => Err(Error::UnknownBuiltin(name.to_string())),
                }
            }
        }
    };
}

builtins! {
    Abs => "abs",
    All => "all",
    Any => "any",
    Apply => "apply",
    Basestring => "basestring",
    Bin => "bin",
    Buffer => "buffer",
    Bytearray => "bytearray",
    Bytes => "bytes",
    Callable => "callable",
    Chr => "chr",
    Classmethod => "classmethod",
    Cmp => "cmp",
    Coerce => "coerce",
    Compile => "compile",
    Complex => "complex",
    Copyright => "copyright",
    Credits => "credits",
    Delattr => "delattr",
    Dir => "dir",
    Divmod => "divmod",
    Enumerate => "enumerate",
    Eval => "eval",
    Execfile => "execfile",
    Exit => "exit",
    File => "file",
    Filter => "filter",
    Format => "format",
    Frozenset => "frozenset",
    Getattr => "getattr",
    Globals => "globals",
    Hasattr => "hasattr",
    Hash => "hash",
    Help => "help",
    Hex => "hex",
    Id => "id",
    Input => "input",
    Intern => "intern",
    Iter => "iter",
    Len => "len",
    License => "license",
    Locals => "locals",
    Long => "long",
    Map => "map",
    Max => "max",
    Memoryview => "memoryview",
    Min => "min",
    Next => "next",
    Oct => "oct",
    Open => "open",
    Ord => "ord",
    Pow => "pow",
    Property => "property",
    Quit => "quit",
    Range => "range",
    RawInput => "raw_input",
    Reduce => "reduce",
    Reload => "reload",
    Repr => "repr",
    Reversed => "reversed",
    Round => "round",
    Set => "set",
    Setattr => "setattr",
    Slice => "slice",
    Sorted => "sorted",
    Staticmethod => "staticmethod",
    Sum => "sum",
    Super => "super",
    Unichr => "unichr",
    Unicode => "unicode",
    Vars => "vars",
    Xrange => "xrange",
    Zip => "zip",
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
