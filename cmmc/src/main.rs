use clap::Parser;
use cmmc::grammar::core::Parser as CmmParser;
use cmmc::grammar::lexer::Lexer;
use cmmc::report::Reporter;
use cmmc::sema::{check, names};

use std::fs;
use std::process;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Input C-- source file
    input: String,

    /// Output assembly file
    #[clap(short, long, default_value = "out.s")]
    output: String,

    /// Dump the token stream and the parsed AST
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let src = match fs::read_to_string(&args.input) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("Failed to open file {}: {}", args.input, e);
            process::exit(1);
        }
    };

    // 1. Tokenize
    let mut rep = Reporter::new(&args.input);
    let tokens = Lexer::new(&src).tokens(&mut rep);
    if args.verbose {
        for (idx, token) in tokens.iter().enumerate() {
            println!("{:>3}: {:?}", idx, token.kind);
        }
    }

    // 2. Parse
    let (mut program, errors) = CmmParser::new(tokens.into_iter()).parse();
    if !errors.is_empty() {
        rep.dump();
        eprintln!("Parser errors:");
        for e in &errors {
            eprintln!("  {}: {}", args.input, e);
        }
        process::exit(1);
    }
    if args.verbose {
        println!("{:#?}", program);
    }

    // 3. Name analysis
    let syms = match names::analyze(&mut program, &mut rep) {
        Ok(syms) => syms,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    // 4. Type check
    check::check(&program, &syms, &mut rep);

    rep.dump();
    if rep.has_error() {
        process::exit(1);
    }

    // 5. Emit
    let asm = cmmc::codegen::generate(&program, &syms);
    if let Err(e) = fs::write(&args.output, asm) {
        eprintln!("Failed to write to file {}: {}", args.output, e);
        process::exit(1);
    }
}
