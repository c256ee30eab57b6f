use super::ast::{
    Assign, BinaryOp, Block, Call, Decl, Dot, Expr, FnDecl, Program, Stmt, StructDecl, TypeSpec,
    UnaryOp, VarDecl,
};
use super::core::Parser;
use super::token::{Token, TokenKind::*};
use crate::error::ParseError;
use crate::{check, expect};

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn parse(mut self) -> (Program, Vec<ParseError>) {
        let program = self.parse_program();
        (program, self.into_errors())
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// program = { decl }
    fn parse_program(&mut self) -> Program {
        let mut decls = Vec::new();
        while self.peek().is_some() {
            match self.parse_decl() {
                Ok(decl) => {
                    decls.push(decl);
                }
                Err(err) => {
                    self.error(err);
                    self.recover_to_decl();
                }
            }
        }
        Program(decls)
    }

    /// decl = var-decl | fn-decl | struct-decl
    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        // "struct" opens either a struct definition or a struct-typed variable
        if check!(self, KwStruct) {
            expect!(self, KwStruct)?;
            let tag = self.parse_ident()?;
            if check!(self, LCurly) {
                // struct-decl = "struct" ident "{" { var-decl } "}" ";"
                expect!(self, LCurly)?;
                let fields = self.seq_until(|kind| matches!(kind, RCurly), |p| p.parse_var_decl())?;
                expect!(self, RCurly)?;
                expect!(self, Semicolon)?;
                return Ok(Decl::Struct(StructDecl { name: tag, fields }));
            }
            // var-decl = "struct" ident ident ";"
            let name = self.parse_ident()?;
            expect!(self, Semicolon)?;
            return Ok(Decl::Var(VarDecl {
                ty: TypeSpec::Struct(tag),
                name,
            }));
        }

        let ty = self.parse_type()?;
        let name = self.parse_ident()?;

        if check!(self, LParen) {
            // fn-decl = type ident "(" [ formals ] ")" "{" body "}"
            expect!(self, LParen)?;
            let formals = self.comma_list(|kind| matches!(kind, RParen), |p| p.parse_formal())?;
            expect!(self, RParen)?;
            expect!(self, LCurly)?;
            let body = self.parse_body()?;
            expect!(self, RCurly)?;
            return Ok(Decl::Fn(FnDecl {
                ret: ty,
                name,
                formals,
                body,
            }));
        }

        // var-decl = type ident ";"
        expect!(self, Semicolon)?;
        Ok(Decl::Var(VarDecl { ty, name }))
    }

    /// type = "int" | "bool" | "void" | "struct" ident
    fn parse_type(&mut self) -> Result<TypeSpec, ParseError> {
        if let Some(token) = self.peek() {
            match token.kind {
                KwInt => {
                    expect!(self, KwInt)?;
                    Ok(TypeSpec::Int)
                }
                KwBool => {
                    expect!(self, KwBool)?;
                    Ok(TypeSpec::Bool)
                }
                KwVoid => {
                    expect!(self, KwVoid)?;
                    Ok(TypeSpec::Void)
                }
                KwStruct => {
                    expect!(self, KwStruct)?;
                    let tag = self.parse_ident()?;
                    Ok(TypeSpec::Struct(tag))
                }
                _ => Err(ParseError::UnexpectedToken(token.into())),
            }
        } else {
            Err(ParseError::UnexpectedEof)
        }
    }

    /// var-decl = type ident ";"
    fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        expect!(self, Semicolon)?;
        Ok(VarDecl { ty, name })
    }

    /// formal = type ident
    fn parse_formal(&mut self) -> Result<VarDecl, ParseError> {
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        Ok(VarDecl { ty, name })
    }

    /// body = { var-decl } { stmt }
    fn parse_body(&mut self) -> Result<Block, ParseError> {
        let mut decls = Vec::new();
        while check!(self, KwInt | KwBool | KwVoid | KwStruct) {
            decls.push(self.parse_var_decl()?);
        }
        let stmts = self.seq_until(|kind| matches!(kind, RCurly), |p| p.parse_stmt())?;
        Ok(Block { decls, stmts })
    }

    /// stmt = read-stmt | write-stmt | if-stmt | while-stmt | repeat-stmt
    ///      | return-stmt | assign-stmt | inc-stmt | dec-stmt | call-stmt
    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        if let Some(token) = self.peek() {
            match &token.kind {
                // read-stmt = "cin" ">>" loc ";"
                KwCin => {
                    expect!(self, KwCin)?;
                    expect!(self, RAngleRAngle)?;
                    let loc = self.parse_loc()?;
                    expect!(self, Semicolon)?;
                    Ok(Stmt::Read(loc))
                }

                // write-stmt = "cout" "<<" expr ";"
                KwCout => {
                    expect!(self, KwCout)?;
                    expect!(self, LAngleLAngle)?;
                    let expr = self.parse_expr()?;
                    expect!(self, Semicolon)?;
                    Ok(Stmt::Write(expr))
                }

                // if-stmt = "if" "(" expr ")" "{" body "}" [ "else" "{" body "}" ]
                KwIf => {
                    expect!(self, KwIf)?;
                    expect!(self, LParen)?;
                    let cond = self.parse_expr()?;
                    expect!(self, RParen)?;
                    expect!(self, LCurly)?;
                    let then_body = self.parse_body()?;
                    expect!(self, RCurly)?;
                    if check!(self, KwElse) {
                        expect!(self, KwElse)?;
                        expect!(self, LCurly)?;
                        let else_body = self.parse_body()?;
                        expect!(self, RCurly)?;
                        Ok(Stmt::IfElse(cond, then_body, else_body))
                    } else {
                        Ok(Stmt::If(cond, then_body))
                    }
                }

                // while-stmt = "while" "(" expr ")" "{" body "}"
                KwWhile => {
                    expect!(self, KwWhile)?;
                    expect!(self, LParen)?;
                    let cond = self.parse_expr()?;
                    expect!(self, RParen)?;
                    expect!(self, LCurly)?;
                    let body = self.parse_body()?;
                    expect!(self, RCurly)?;
                    Ok(Stmt::While(cond, body))
                }

                // repeat-stmt = "repeat" "(" expr ")" "{" body "}"
                KwRepeat => {
                    expect!(self, KwRepeat)?;
                    expect!(self, LParen)?;
                    let clause = self.parse_expr()?;
                    expect!(self, RParen)?;
                    expect!(self, LCurly)?;
                    let body = self.parse_body()?;
                    expect!(self, RCurly)?;
                    Ok(Stmt::Repeat(clause, body))
                }

                // return-stmt = "return" [ expr ] ";"
                KwReturn => {
                    let tok = expect!(self, KwReturn)?;
                    let expr = if !check!(self, Semicolon) {
                        Some(self.parse_expr()?)
                    } else {
                        None
                    };
                    expect!(self, Semicolon)?;
                    Ok(Stmt::Return(tok.pos, expr))
                }

                Ident(_) => {
                    let id = self.parse_ident()?;

                    // call-stmt = ident "(" [ actuals ] ")" ";"
                    if check!(self, LParen) {
                        expect!(self, LParen)?;
                        let actuals =
                            self.comma_list(|kind| matches!(kind, RParen), |p| p.parse_expr())?;
                        expect!(self, RParen)?;
                        expect!(self, Semicolon)?;
                        return Ok(Stmt::Call(Call {
                            callee: id,
                            actuals,
                        }));
                    }

                    let loc = self.parse_loc_tail(Expr::Ident(id))?;

                    if let Some(token) = self.peek() {
                        match token.kind {
                            // assign-stmt = loc "=" expr ";"
                            Equal => {
                                expect!(self, Equal)?;
                                let rhs = self.parse_expr()?;
                                expect!(self, Semicolon)?;
                                Ok(Stmt::Assign(Assign { lhs: loc, rhs }))
                            }
                            // inc-stmt = loc "++" ";"
                            PlusPlus => {
                                expect!(self, PlusPlus)?;
                                expect!(self, Semicolon)?;
                                Ok(Stmt::PostInc(loc))
                            }
                            // dec-stmt = loc "--" ";"
                            MinusMinus => {
                                expect!(self, MinusMinus)?;
                                expect!(self, Semicolon)?;
                                Ok(Stmt::PostDec(loc))
                            }
                            _ => Err(ParseError::UnexpectedToken(token.into())),
                        }
                    } else {
                        Err(ParseError::UnexpectedEof)
                    }
                }

                _ => Err(ParseError::UnexpectedToken(token.into())),
            }
        } else {
            Err(ParseError::UnexpectedEof)
        }
    }

    /// loc = ident { "." ident }
    fn parse_loc(&mut self) -> Result<Expr, ParseError> {
        let id = self.parse_ident()?;
        self.parse_loc_tail(Expr::Ident(id))
    }

    fn parse_loc_tail(&mut self, mut loc: Expr) -> Result<Expr, ParseError> {
        while check!(self, Period) {
            expect!(self, Period)?;
            let field = self.parse_ident()?;
            loc = Expr::Dot(Box::new(Dot {
                loc,
                field,
                def: None,
                bad: false,
            }));
        }
        Ok(loc)
    }

    /// expr = loc "=" expr | or-expr
    ///
    /// Assignment is right-associative and only a loc may appear on its
    /// left-hand side.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_or_expr()?;
        if check!(self, Equal) {
            let tok = expect!(self, Equal)?;
            if !matches!(lhs, Expr::Ident(_) | Expr::Dot(_)) {
                return Err(ParseError::UnexpectedToken((&tok).into()));
            }
            let rhs = self.parse_expr()?;
            return Ok(Expr::Assign(Box::new(Assign { lhs, rhs })));
        }
        Ok(lhs)
    }

    /// or-expr = and-expr { "||" and-expr }
    fn parse_or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_and_expr()?;
        while check!(self, PipePipe) {
            expect!(self, PipePipe)?;
            let rhs = self.parse_and_expr()?;
            lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// and-expr = eq-expr { "&&" eq-expr }
    fn parse_and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_eq_expr()?;
        while check!(self, AmpAmp) {
            expect!(self, AmpAmp)?;
            let rhs = self.parse_eq_expr()?;
            lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// eq-expr = relat-expr { ( "==" | "!=" ) relat-expr }
    fn parse_eq_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_relat_expr()?;
        loop {
            if check!(self, EqualEqual) {
                expect!(self, EqualEqual)?;
                let rhs = self.parse_relat_expr()?;
                lhs = Expr::Binary(BinaryOp::Eq, Box::new(lhs), Box::new(rhs));
            } else if check!(self, ExclEqual) {
                expect!(self, ExclEqual)?;
                let rhs = self.parse_relat_expr()?;
                lhs = Expr::Binary(BinaryOp::Ne, Box::new(lhs), Box::new(rhs));
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    /// relat-expr = add-expr [ ( "<" | "<=" | ">" | ">=" ) add-expr ]
    fn parse_relat_expr(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_add_expr()?;
        if let Some(token) = self.peek() {
            let op = match token.kind {
                LAngle => Some(BinaryOp::Lt),
                LAngleEqual => Some(BinaryOp::Le),
                RAngle => Some(BinaryOp::Gt),
                RAngleEqual => Some(BinaryOp::Ge),
                _ => None,
            };
            if let Some(op) = op {
                self.bump();
                let rhs = self.parse_add_expr()?;
                return Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)));
            }
        }
        Ok(lhs)
    }

    /// add-expr = mul-expr { ( "+" | "-" ) mul-expr }
    fn parse_add_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_mul_expr()?;
        loop {
            if check!(self, Plus) {
                expect!(self, Plus)?;
                let rhs = self.parse_mul_expr()?;
                lhs = Expr::Binary(BinaryOp::Plus, Box::new(lhs), Box::new(rhs));
            } else if check!(self, Minus) {
                expect!(self, Minus)?;
                let rhs = self.parse_mul_expr()?;
                lhs = Expr::Binary(BinaryOp::Minus, Box::new(lhs), Box::new(rhs));
            } else {
                return Ok(lhs);
            }
        }
    }

    /// mul-expr = unary-expr { ( "*" | "/" ) unary-expr }
    fn parse_mul_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary_expr()?;
        loop {
            if check!(self, Star) {
                expect!(self, Star)?;
                let rhs = self.parse_unary_expr()?;
                lhs = Expr::Binary(BinaryOp::Times, Box::new(lhs), Box::new(rhs));
            } else if check!(self, Slash) {
                expect!(self, Slash)?;
                let rhs = self.parse_unary_expr()?;
                lhs = Expr::Binary(BinaryOp::Divide, Box::new(lhs), Box::new(rhs));
            } else {
                return Ok(lhs);
            }
        }
    }

    /// unary-expr = ( "-" | "!" ) unary-expr | term
    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        if check!(self, Minus) {
            expect!(self, Minus)?;
            let expr = self.parse_unary_expr()?;
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(expr)));
        }
        if check!(self, Excl) {
            expect!(self, Excl)?;
            let expr = self.parse_unary_expr()?;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(expr)));
        }
        self.parse_term()
    }

    /// term = int-lit | string-lit | "true" | "false" | "(" expr ")"
    ///      | ident "(" [ actuals ] ")" | loc
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        if let Some(token) = self.peek() {
            match &token.kind {
                IntLit(_, val) => {
                    let val = *val;
                    let tok = expect!(self, IntLit(_, _))?;
                    Ok(Expr::IntLit(tok.pos, val))
                }

                StrLit(lexeme) => {
                    let lexeme = lexeme.clone();
                    let tok = expect!(self, StrLit(_))?;
                    Ok(Expr::StrLit(tok.pos, lexeme))
                }

                KwTrue => {
                    let tok = expect!(self, KwTrue)?;
                    Ok(Expr::True(tok.pos))
                }

                KwFalse => {
                    let tok = expect!(self, KwFalse)?;
                    Ok(Expr::False(tok.pos))
                }

                LParen => {
                    expect!(self, LParen)?;
                    let inner = self.parse_expr()?;
                    expect!(self, RParen)?;
                    Ok(inner)
                }

                Ident(_) => {
                    let id = self.parse_ident()?;

                    // call = ident "(" [ actuals ] ")"
                    if check!(self, LParen) {
                        expect!(self, LParen)?;
                        let actuals =
                            self.comma_list(|kind| matches!(kind, RParen), |p| p.parse_expr())?;
                        expect!(self, RParen)?;
                        return Ok(Expr::Call(Call {
                            callee: id,
                            actuals,
                        }));
                    }

                    self.parse_loc_tail(Expr::Ident(id))
                }

                _ => Err(ParseError::UnexpectedToken(token.into())),
            }
        } else {
            Err(ParseError::UnexpectedEof)
        }
    }

    /// ident = ( "A".."Z" | "a".."z" | "_" ) { "0".."9" | "A".."Z" | "a".."z" | "_" }
    fn parse_ident(&mut self) -> Result<super::ast::Ident, ParseError> {
        let tok = expect!(self, Ident(_))?;
        match tok.kind {
            Ident(name) => Ok(super::ast::Ident::new(name, tok.pos)),
            _ => unreachable!(),
        }
    }
}
