use crate::error::ScopeError;
use crate::grammar::ast::{
    Block, Call, Decl, Dot, Expr, FnDecl, Ident, Program, Stmt, StructDecl, TypeSpec, VarDecl,
};
use crate::report::Reporter;
use crate::sema::symbol::{FnSym, Offset, ScopeTable, Sym, SymId, SymKind, Symbols};
use crate::sema::types::SemType;

use indexmap::IndexMap;

/// Run name analysis over the whole program: link every identifier use to a
/// symbol, assign frame offsets, and check that `main` exists. The AST is
/// mutated in place; the filled symbol arena is returned for the later
/// passes.
pub fn analyze(program: &mut Program, rep: &mut Reporter) -> Result<Symbols, ScopeError> {
    let mut pass = NameAnalysis {
        syms: Symbols::default(),
        scopes: ScopeTable::new(),
        rep,
        cursor: Offset::Global,
    };
    pass.program(program)?;
    Ok(pass.syms)
}

struct NameAnalysis<'a> {
    syms: Symbols,
    scopes: ScopeTable,
    rep: &'a mut Reporter,
    cursor: Offset,
}

// ----------------------------------------------------------------------------
// Declarations
// ----------------------------------------------------------------------------

impl<'a> NameAnalysis<'a> {
    fn program(&mut self, program: &mut Program) -> Result<(), ScopeError> {
        for decl in &mut program.0 {
            match decl {
                Decl::Var(v) => {
                    self.var_decl(v)?;
                }
                Decl::Fn(f) => self.fn_decl(f)?,
                Decl::Struct(s) => self.struct_decl(s)?,
            }
        }

        let has_main = program
            .0
            .iter()
            .any(|d| matches!(d, Decl::Fn(f) if f.name.name == "main"));
        if !has_main {
            self.rep.error(0, 0, "No main function");
        }

        self.scopes.remove_scope()?;
        Ok(())
    }

    /// Claim the next 4-byte slot at the current cursor.
    fn take_slot(&mut self) -> Offset {
        match self.cursor {
            Offset::Global => Offset::Global,
            Offset::Frame(cur) => {
                self.cursor = Offset::Frame(cur - 4);
                Offset::Frame(cur)
            }
        }
    }

    /// `T x;` : void check, struct-type lookup, duplicate check, insert.
    fn var_decl(&mut self, v: &mut VarDecl) -> Result<Option<SymId>, ScopeError> {
        let mut bad = false;
        let mut def = None;

        match &mut v.ty {
            TypeSpec::Void => {
                self.rep
                    .error(v.name.pos.line, v.name.pos.col, "Non-function declared void");
                bad = true;
            }
            TypeSpec::Struct(tag) => match self.scopes.lookup_global(&tag.name) {
                Some(id) if matches!(self.syms.sym(id).kind, SymKind::StructDef { .. }) => {
                    tag.sym = Some(id);
                    def = Some(id);
                }
                _ => {
                    self.rep
                        .error(tag.pos.line, tag.pos.col, "Invalid name of struct type");
                    bad = true;
                }
            },
            _ => {}
        }

        if self.scopes.lookup_local(&v.name.name).is_some() {
            self.rep
                .error(v.name.pos.line, v.name.pos.col, "Multiply declared identifier");
            bad = true;
        }

        if bad {
            return Ok(None);
        }

        let offset = self.take_slot();
        let kind = match def {
            Some(def) => SymKind::StructVar { def, offset },
            None => SymKind::Var {
                ty: SemType::of_spec(&v.ty),
                offset,
            },
        };
        let id = self.syms.alloc(Sym {
            name: v.name.name.clone(),
            kind,
        });
        self.scopes.add_decl(&v.name.name, id)?;
        v.name.sym = Some(id);
        Ok(Some(id))
    }

    /// Formals carry void and duplicate checks only; the offset advances per
    /// successfully declared formal.
    fn formal_decl(&mut self, f: &mut VarDecl, offset: i32) -> Result<Option<SemType>, ScopeError> {
        let mut bad = false;

        if matches!(f.ty, TypeSpec::Void) {
            self.rep
                .error(f.name.pos.line, f.name.pos.col, "Non-function declared void");
            bad = true;
        }

        if self.scopes.lookup_local(&f.name.name).is_some() {
            self.rep
                .error(f.name.pos.line, f.name.pos.col, "Multiply declared identifier");
            bad = true;
        }

        if bad {
            return Ok(None);
        }

        let ty = SemType::of_spec(&f.ty);
        let id = self.syms.alloc(Sym {
            name: f.name.name.clone(),
            kind: SymKind::Var {
                ty: ty.clone(),
                offset: Offset::Frame(offset),
            },
        });
        self.scopes.add_decl(&f.name.name, id)?;
        f.name.sym = Some(id);
        Ok(Some(ty))
    }

    /// `T f(formals) { body }` : bind the function, then analyze formals and
    /// body in a fresh scope. A multiply declared function still gets its
    /// body analyzed.
    fn fn_decl(&mut self, f: &mut FnDecl) -> Result<(), ScopeError> {
        let mut fn_id = None;

        if self.scopes.lookup_local(&f.name.name).is_some() {
            self.rep
                .error(f.name.pos.line, f.name.pos.col, "Multiply declared identifier");
        } else {
            let id = self.syms.alloc(Sym {
                name: f.name.name.clone(),
                kind: SymKind::Fn(FnSym {
                    ret: SemType::of_spec(&f.ret),
                    params: Vec::new(),
                    size_params: 0,
                    size_locals: 0,
                }),
            });
            self.scopes.add_decl(&f.name.name, id)?;
            f.name.sym = Some(id);
            fn_id = Some(id);
        }

        self.scopes.add_scope();

        let mut params = Vec::new();
        let mut offset = 4;
        for formal in &mut f.formals {
            if let Some(ty) = self.formal_decl(formal, offset)? {
                params.push(ty);
                offset += 4;
            }
        }
        let size_params = offset - 4;

        // locals descend from -8; two saved-register slots sit above
        let saved = self.cursor;
        self.cursor = Offset::Frame(-8);
        self.block(&mut f.body)?;
        let size_locals = match self.cursor {
            Offset::Frame(cur) => -(cur + 8),
            Offset::Global => 0,
        };
        self.cursor = saved;

        if let Some(id) = fn_id {
            if let SymKind::Fn(sym) = &mut self.syms.sym_mut(id).kind {
                sym.params = params;
                sym.size_params = size_params;
                sym.size_locals = size_locals;
            }
        }

        self.scopes.remove_scope()?;
        Ok(())
    }

    /// `struct S { fields };` : the fields live in a table owned by the
    /// definition symbol; struct-typed fields resolve against the enclosing
    /// scopes.
    fn struct_decl(&mut self, s: &mut StructDecl) -> Result<(), ScopeError> {
        if self.scopes.lookup_local(&s.name.name).is_some() {
            self.rep
                .error(s.name.pos.line, s.name.pos.col, "Multiply declared identifier");
            return Ok(());
        }

        let mut fields = IndexMap::new();
        for field in &mut s.fields {
            self.field_decl(field, &mut fields);
        }

        let id = self.syms.alloc(Sym {
            name: s.name.name.clone(),
            kind: SymKind::StructDef { fields },
        });
        self.scopes.add_decl(&s.name.name, id)?;
        s.name.sym = Some(id);
        Ok(())
    }

    fn field_decl(&mut self, v: &mut VarDecl, fields: &mut IndexMap<String, SymId>) {
        let mut bad = false;
        let mut def = None;

        match &mut v.ty {
            TypeSpec::Void => {
                self.rep
                    .error(v.name.pos.line, v.name.pos.col, "Non-function declared void");
                bad = true;
            }
            TypeSpec::Struct(tag) => match self.scopes.lookup_global(&tag.name) {
                Some(id) if matches!(self.syms.sym(id).kind, SymKind::StructDef { .. }) => {
                    tag.sym = Some(id);
                    def = Some(id);
                }
                _ => {
                    self.rep
                        .error(tag.pos.line, tag.pos.col, "Invalid name of struct type");
                    bad = true;
                }
            },
            _ => {}
        }

        if fields.contains_key(&v.name.name) {
            self.rep
                .error(v.name.pos.line, v.name.pos.col, "Multiply declared identifier");
            bad = true;
        }

        if bad {
            return;
        }

        // field offsets are never consulted by the emitter
        let kind = match def {
            Some(def) => SymKind::StructVar {
                def,
                offset: Offset::Global,
            },
            None => SymKind::Var {
                ty: SemType::of_spec(&v.ty),
                offset: Offset::Global,
            },
        };
        let id = self.syms.alloc(Sym {
            name: v.name.name.clone(),
            kind,
        });
        fields.insert(v.name.name.clone(), id);
        v.name.sym = Some(id);
    }
}

// ----------------------------------------------------------------------------
// Statements and expressions
// ----------------------------------------------------------------------------

impl<'a> NameAnalysis<'a> {
    fn block(&mut self, block: &mut Block) -> Result<(), ScopeError> {
        for decl in &mut block.decls {
            self.var_decl(decl)?;
        }
        for stmt in &mut block.stmts {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &mut Stmt) -> Result<(), ScopeError> {
        match stmt {
            Stmt::Assign(assign) => {
                self.expr(&mut assign.lhs)?;
                self.expr(&mut assign.rhs)?;
            }

            Stmt::PostInc(e) | Stmt::PostDec(e) | Stmt::Read(e) | Stmt::Write(e) => {
                self.expr(e)?;
            }

            Stmt::If(cond, body) | Stmt::While(cond, body) | Stmt::Repeat(cond, body) => {
                self.expr(cond)?;
                self.scopes.add_scope();
                self.block(body)?;
                self.scopes.remove_scope()?;
            }

            Stmt::IfElse(cond, then_body, else_body) => {
                self.expr(cond)?;

                let start = self.cursor;
                self.scopes.add_scope();
                self.block(then_body)?;
                let after_then = self.cursor;
                self.scopes.remove_scope()?;

                self.scopes.add_scope();
                self.cursor = start;
                self.block(else_body)?;
                let after_else = self.cursor;
                self.scopes.remove_scope()?;

                // the frame must accommodate either arm
                self.cursor = match (after_then, after_else) {
                    (Offset::Frame(a), Offset::Frame(b)) => Offset::Frame(a.min(b)),
                    _ => after_else,
                };
            }

            Stmt::Call(call) => self.call(call)?,

            Stmt::Return(_, Some(e)) => self.expr(e)?,
            Stmt::Return(_, None) => {}
        }
        Ok(())
    }

    fn expr(&mut self, expr: &mut Expr) -> Result<(), ScopeError> {
        match expr {
            Expr::IntLit(..) | Expr::StrLit(..) | Expr::True(_) | Expr::False(_) => {}
            Expr::Ident(id) => self.ident_use(id),
            Expr::Dot(dot) => self.dot(dot)?,
            Expr::Assign(assign) => {
                self.expr(&mut assign.lhs)?;
                self.expr(&mut assign.rhs)?;
            }
            Expr::Call(call) => self.call(call)?,
            Expr::Unary(_, operand) => self.expr(operand)?,
            Expr::Binary(_, lhs, rhs) => {
                self.expr(lhs)?;
                self.expr(rhs)?;
            }
        }
        Ok(())
    }

    fn ident_use(&mut self, id: &mut Ident) {
        match self.scopes.lookup_global(&id.name) {
            Some(sym) => id.sym = Some(sym),
            None => self.rep.error(id.pos.line, id.pos.col, "Undeclared identifier"),
        }
    }

    fn call(&mut self, call: &mut Call) -> Result<(), ScopeError> {
        self.ident_use(&mut call.callee);
        for actual in &mut call.actuals {
            self.expr(actual)?;
        }
        Ok(())
    }

    /// `loc . field` : resolve the field in the struct table of `loc`, and
    /// record the field's own struct definition so a chained access can keep
    /// going. `bad` stops further diagnostics for this chain.
    fn dot(&mut self, dot: &mut Dot) -> Result<(), ScopeError> {
        self.expr(&mut dot.loc)?;

        let table = match &dot.loc {
            Expr::Ident(id) => match id.sym {
                // undeclared: already reported
                None => {
                    dot.bad = true;
                    None
                }
                Some(sym) => match self.syms.sym(sym).kind {
                    SymKind::StructVar { def, .. } => Some(def),
                    _ => {
                        self.rep
                            .error(id.pos.line, id.pos.col, "Dot-access of non-struct type");
                        dot.bad = true;
                        None
                    }
                },
            },
            Expr::Dot(inner) => {
                if inner.bad {
                    dot.bad = true;
                    None
                } else if let Some(def) = inner.def {
                    Some(def)
                } else {
                    self.rep.error(
                        inner.field.pos.line,
                        inner.field.pos.col,
                        "Dot-access of non-struct type",
                    );
                    dot.bad = true;
                    None
                }
            }
            _ => unreachable!("dot access through a non-place expression"),
        };

        let Some(table) = table else {
            return Ok(());
        };

        let field_sym = match &self.syms.sym(table).kind {
            SymKind::StructDef { fields } => fields.get(&dot.field.name).copied(),
            _ => unreachable!("struct link does not name a struct definition"),
        };

        match field_sym {
            None => {
                self.rep
                    .error(dot.field.pos.line, dot.field.pos.col, "Invalid struct field name");
                dot.bad = true;
            }
            Some(sym) => {
                dot.field.sym = Some(sym);
                if let SymKind::StructVar { def, .. } = self.syms.sym(sym).kind {
                    dot.def = Some(def);
                }
            }
        }
        Ok(())
    }
}
