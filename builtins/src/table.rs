//! The mapping from builtins to their substitutes.

use crate::{
    pure::{self, PureImplementation},
    Builtin, Error,
};
use kiln_parallel::Strategy;
use kiln_sequence::reduce;
use std::{collections::BTreeMap, sync::Arc};
use tracing::debug;

/// Maps every known [`Builtin`] to the implementation that replaces it.
///
/// `None` means the host runtime implements the builtin natively and no
/// substitution is needed.
#[derive(Clone, Default)]
pub struct Table {
    entries: BTreeMap<Builtin, Option<Arc<dyn PureImplementation>>>,
}

impl Table {
    /// The standard table: every builtin is present, and the thirteen with pure
    /// implementations are overridden.
    ///
    /// `sum` splits its work with `strategy`, bounded by `config`.
    pub fn standard<S: Strategy>(strategy: S, config: reduce::Config) -> Self {
        let mut table = Self {
            entries: Builtin::ALL.iter().map(|builtin| (*builtin, None)).collect(),
        };
        let overrides: [Arc<dyn PureImplementation>; 13] = [
            Arc::new(pure::Abs),
            Arc::new(pure::All),
            Arc::new(pure::Any),
            Arc::new(pure::Chr),
            Arc::new(pure::Len),
            Arc::new(pure::Max),
            Arc::new(pure::Min),
            Arc::new(pure::Ord),
            Arc::new(pure::Range),
            Arc::new(pure::Reduce),
            Arc::new(pure::Reversed),
            Arc::new(pure::Sum::new(strategy, config)),
            Arc::new(pure::XRange),
        ];
        for implementation in overrides {
            table.insert(implementation);
        }
        debug!(
            builtins = table.len(),
            overrides = table.overrides().count(),
            max_depth = config.max_depth,
            "built standard table"
        );
        table
    }

    /// Installs `implementation` for the builtin it replaces, returning the
    /// previous entry.
    pub fn insert(
        &mut self,
        implementation: Arc<dyn PureImplementation>,
    ) -> Option<Arc<dyn PureImplementation>> {
        self.entries
            .insert(implementation.builtin(), Some(implementation))
            .flatten()
    }

    /// The substitute for `builtin`, or `None` if the host provides it.
    pub fn get(&self, builtin: Builtin) -> Option<&Arc<dyn PureImplementation>> {
        self.entries.get(&builtin).and_then(Option::as_ref)
    }

    /// Looks up a builtin by name.
    ///
    /// Fails with [`Error::UnknownBuiltin`] if the name is not a builtin in this
    /// table. `Ok(None)` means the host provides the builtin.
    pub fn lookup(&self, name: &str) -> Result<Option<&Arc<dyn PureImplementation>>, Error> {
        let builtin: Builtin = name.parse()?;
        match self.entries.get(&builtin) {
            Some(entry) => Ok(entry.as_ref()),
            None => Err(Error::UnknownBuiltin(name.to_string())),
        }
    }

    /// The builtins that have a substitute, in name order.
    pub fn overrides(&self) -> impl Iterator<Item = (Builtin, &Arc<dyn PureImplementation>)> {
        self.entries
            .iter()
            .filter_map(|(builtin, entry)| entry.as_ref().map(|entry| (*builtin, entry)))
    }

    /// Every entry, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (Builtin, Option<&Arc<dyn PureImplementation>>)> {
        self.entries
            .iter()
            .map(|(builtin, entry)| (*builtin, entry.as_ref()))
    }

    /// Number of builtins in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no builtins.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
