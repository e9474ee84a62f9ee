//! Command-line driver: compile one rule file and dump the result.
//!
//! Exit codes: 0 on success, 1 on bad usage, 2 when the file cannot be
//! read, 3 when the rule has errors.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use lexdef::{RuleCompiler, Scope, Session, SourceText};

#[derive(Debug, Parser)]
#[command(name = "lexdef", about = "Compile a lexer rule `name -> {regex}` and dump its AST")]
struct Args {
    /// Path to the file holding the rule.
    file: PathBuf,
}

/// Actions every generated scanner has available; a rule body may reference
/// them with `$name` without defining them first.
const BUILTIN_ACTIONS: &[(&str, &str)] = &[
    ("write", "buffer += ch;"),
    ("add_dec_digit_to_char_code", "char_code = char_code * 10 + digit2int(ch);"),
    ("add_hex_digit_to_char_code", "char_code = char_code << 4 + digit2int(ch);"),
    ("add_bin_digit_to_char_code", "char_code = char_code << 1 + digit2int(ch);"),
    ("add_oct_digit_to_char_code", "char_code = char_code << 3 + digit2int(ch);"),
    ("write_by_code", "buffer += char_code;"),
    ("add_dec_digit", "token.int_value = token.int_value * 10 + digit2int(ch);"),
    ("add_hex_digit", "token.int_value = token.int_value << 4 + digit2int(ch);"),
    ("add_bin_digit", "token.int_value = token.int_value << 1 + digit2int(ch);"),
    ("add_oct_digit", "token.int_value = token.int_value << 3 + digit2int(ch);"),
];

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    let text = match SourceText::load(&args.file) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("lexdef: {}: {err}", args.file.display());
            return ExitCode::from(2);
        }
    };

    let mut sess = Session::new(&text);
    let mut scope = Scope::new();
    for &(name, body) in BUILTIN_ACTIONS {
        let name = sess.ids.intern(name);
        let body = sess.strs.intern(body);
        scope.define_action(name, body);
    }

    let mut compiler = RuleCompiler::new(scope);
    let rule = compiler.compile(&mut sess);

    let errors = sess.diags.error_count();
    if errors > 0 {
        println!("Total number of errors: {errors}.");
        return ExitCode::from(3);
    }

    if let Some(name) = rule.name {
        println!(
            "rule with name {} [{}]:",
            sess.ids.resolve(name),
            name.as_usize()
        );
    }
    print!("{}", rule.body.dump());
    ExitCode::SUCCESS
}
