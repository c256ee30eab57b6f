use crate::error::ScopeError;
use crate::sema::types::SemType;

use indexmap::IndexMap;

/// Stable handle into the symbol arena. Identifier nodes and struct-instance
/// entries hold these instead of references, so the arena can be shared by
/// the later passes after the scope stack is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymId(usize);

/// Frame displacement of a variable. Parameters sit at positive offsets from
/// `$fp`, locals at negative ones; module-level variables use the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Global,
    Frame(i32),
}

#[derive(Debug, Clone)]
pub struct Sym {
    pub name: String,
    pub kind: SymKind,
}

#[derive(Debug, Clone)]
pub enum SymKind {
    /// int / bool variable (also formals of any type)
    Var { ty: SemType, offset: Offset },
    /// function
    Fn(FnSym),
    /// struct definition, owning its field table
    StructDef { fields: IndexMap<String, SymId> },
    /// variable declared with a struct type, linked to its definition
    StructVar { def: SymId, offset: Offset },
}

#[derive(Debug, Clone)]
pub struct FnSym {
    pub ret: SemType,
    pub params: Vec<SemType>,
    pub size_params: i32,
    pub size_locals: i32,
}

/// The symbol arena. Outlives the scope stack; name analysis fills it and the
/// type checker and emitter read it through `SymId` handles.
#[derive(Debug, Default)]
pub struct Symbols {
    syms: Vec<Sym>,
}

impl Symbols {
    pub fn alloc(&mut self, sym: Sym) -> SymId {
        let id = SymId(self.syms.len());
        self.syms.push(sym);
        id
    }

    pub fn sym(&self, id: SymId) -> &Sym {
        &self.syms[id.0]
    }

    pub fn sym_mut(&mut self, id: SymId) -> &mut Sym {
        &mut self.syms[id.0]
    }

    /// Semantic type of a symbol, per its kind.
    pub fn type_of(&self, id: SymId) -> SemType {
        let sym = self.sym(id);
        match &sym.kind {
            SymKind::Var { ty, .. } => ty.clone(),
            SymKind::Fn(f) => SemType::Fn {
                params: f.params.clone(),
                ret: Box::new(f.ret.clone()),
            },
            SymKind::StructDef { .. } => SemType::StructDef(sym.name.clone()),
            SymKind::StructVar { def, .. } => SemType::Struct(self.sym(*def).name.clone()),
        }
    }

    pub fn offset_of(&self, id: SymId) -> Offset {
        match &self.sym(id).kind {
            SymKind::Var { offset, .. } | SymKind::StructVar { offset, .. } => *offset,
            _ => Offset::Global,
        }
    }
}

/// Lexical scope stack: a LIFO of name→symbol maps. Created with the outer
/// (global) scope already open; torn down at end of pass.
#[derive(Debug)]
pub struct ScopeTable {
    scopes: Vec<IndexMap<String, SymId>>,
}

impl ScopeTable {
    pub fn new() -> Self {
        ScopeTable {
            scopes: vec![IndexMap::new()],
        }
    }

    pub fn add_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub fn remove_scope(&mut self) -> Result<IndexMap<String, SymId>, ScopeError> {
        self.scopes.pop().ok_or(ScopeError::EmptyScope)
    }

    pub fn add_decl(&mut self, name: &str, id: SymId) -> Result<(), ScopeError> {
        if name.is_empty() {
            return Err(ScopeError::BadArgument);
        }
        let top = self.scopes.last_mut().ok_or(ScopeError::EmptyScope)?;
        if top.contains_key(name) {
            return Err(ScopeError::DuplicateLocal(name.to_string()));
        }
        top.insert(name.to_string(), id);
        Ok(())
    }

    pub fn lookup_local(&self, name: &str) -> Option<SymId> {
        self.scopes.last().and_then(|top| top.get(name).copied())
    }

    pub fn lookup_global(&self, name: &str) -> Option<SymId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::types::SemType;

    fn var(name: &str) -> Sym {
        Sym {
            name: name.to_string(),
            kind: SymKind::Var {
                ty: SemType::Int,
                offset: Offset::Global,
            },
        }
    }

    #[test]
    fn test_lookup_local_vs_global() {
        let mut syms = Symbols::default();
        let mut tab = ScopeTable::new();

        let outer = syms.alloc(var("x"));
        tab.add_decl("x", outer).unwrap();

        tab.add_scope();
        assert_eq!(tab.lookup_local("x"), None);
        assert_eq!(tab.lookup_global("x"), Some(outer));

        let inner = syms.alloc(var("x"));
        tab.add_decl("x", inner).unwrap();
        assert_eq!(tab.lookup_local("x"), Some(inner));
        assert_eq!(tab.lookup_global("x"), Some(inner));

        tab.remove_scope().unwrap();
        assert_eq!(tab.lookup_global("x"), Some(outer));
    }

    #[test]
    fn test_duplicate_local() {
        let mut syms = Symbols::default();
        let mut tab = ScopeTable::new();

        let a = syms.alloc(var("a"));
        tab.add_decl("a", a).unwrap();
        let b = syms.alloc(var("a"));
        assert_eq!(
            tab.add_decl("a", b),
            Err(ScopeError::DuplicateLocal("a".to_string()))
        );
    }

    #[test]
    fn test_empty_scope() {
        let mut tab = ScopeTable::new();
        tab.remove_scope().unwrap();
        assert_eq!(tab.remove_scope(), Err(ScopeError::EmptyScope));

        let mut syms = Symbols::default();
        let a = syms.alloc(var("a"));
        assert_eq!(tab.add_decl("a", a), Err(ScopeError::EmptyScope));
    }

    #[test]
    fn test_bad_argument() {
        let mut syms = Symbols::default();
        let mut tab = ScopeTable::new();
        let a = syms.alloc(var(""));
        assert_eq!(tab.add_decl("", a), Err(ScopeError::BadArgument));
    }
}
