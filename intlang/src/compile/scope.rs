//! Name bindings.
use crate::layout::AddrId;
use smol_str::SmolStr;
use std::collections::BTreeMap;

/// Name bound inside a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Parameter by position. Read only.
    Param(usize),
    /// Local slot in the frame.
    Local(usize),
}

/// Name bound for the whole program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Global {
    /// Variable in the globals section. Its value is the cell's content.
    Var(AddrId),
    /// Function entry or other block. Its value is the block's location.
    Label(AddrId),
}

#[derive(Debug, Default)]
pub struct GlobalScope {
    symbols: BTreeMap<SmolStr, Global>,
}

impl GlobalScope {
    /// Bind a name, replacing any earlier definition.
    #[inline]
    pub fn insert(&mut self, name: SmolStr, global: Global) {
        self.symbols.insert(name, global);
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<Global> {
        self.symbols.get(name).copied()
    }
}

/// Bindings of one function, and the size of its frame.
#[derive(Debug, Default)]
pub struct LocalScope {
    bindings: BTreeMap<SmolStr, Binding>,
    /// Number of local slots allocated so far.
    frame_size: usize,
}

impl LocalScope {
    pub fn with_params<'a>(params: impl IntoIterator<Item = &'a SmolStr>) -> Self {
        let mut scope = Self::default();
        for (index, name) in params.into_iter().enumerate() {
            scope.bindings.insert(name.clone(), Binding::Param(index));
        }
        scope
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).copied()
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Bind a name to a new local slot.
    pub fn declare_local(&mut self, name: SmolStr) -> usize {
        let slot = self.alloc_slots(1);
        self.bindings.insert(name, Binding::Local(slot));
        slot
    }

    /// Reserve a run of unnamed local slots, returning the first.
    pub fn alloc_slots(&mut self, count: usize) -> usize {
        let first = self.frame_size;
        self.frame_size += count;
        first
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_frame_grows_with_locals() {
        let params = [SmolStr::from("a"), SmolStr::from("b")];
        let mut scope = LocalScope::with_params(&params);

        assert_eq!(scope.get("b"), Some(Binding::Param(1)));
        assert_eq!(scope.frame_size(), 0);

        assert_eq!(scope.declare_local(SmolStr::from("x")), 0);
        assert_eq!(scope.alloc_slots(3), 1);
        assert_eq!(scope.declare_local(SmolStr::from("y")), 4);
        assert_eq!(scope.frame_size(), 5);
        assert_eq!(scope.get("y"), Some(Binding::Local(4)));
        assert_eq!(scope.get("z"), None);
    }
}
