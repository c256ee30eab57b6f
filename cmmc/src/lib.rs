pub mod codegen;
pub mod error;
pub mod grammar;
pub mod report;
pub mod sema;

pub use error::Error;
pub use grammar::core::Parser;
pub use grammar::lexer::Lexer;
pub use report::Reporter;

use grammar::ast::Program;
use sema::symbol::Symbols;

/// Front half of the pipeline: lex, parse, name-analyze, type-check. Parse
/// errors abort; semantic diagnostics accumulate in the returned reporter,
/// qualified by the given file name.
pub fn analyze(file: &str, src: &str) -> Result<(Program, Symbols, Reporter), Error> {
    let mut rep = Reporter::new(file);
    let tokens = Lexer::new(src).tokens(&mut rep);
    let (mut program, errors) = Parser::new(tokens.into_iter()).parse();
    if !errors.is_empty() {
        return Err(Error::Parse(errors));
    }
    let syms = sema::names::analyze(&mut program, &mut rep)?;
    sema::check::check(&program, &syms, &mut rep);
    Ok((program, syms, rep))
}

/// Full pipeline: analysis, then emission when the program is error-free.
pub fn compile(file: &str, src: &str) -> Result<String, Error> {
    let (program, syms, rep) = analyze(file, src)?;
    if rep.has_error() {
        return Err(Error::Semantic(rep.into_msgs()));
    }
    Ok(codegen::generate(&program, &syms))
}
