//! String analysis example.
//!
//! Runs the Bricks domain over a few small programs and prints the
//! resulting abstract states:
//!
//! ```text
//! cargo run --example string_analysis -- --k-s 5 --verbose
//! ```

use clap::Parser;

use bricks_rs::bricks::Bricks;
use bricks_rs::config::Thresholds;
use bricks_rs::expr::{Stmt, StrExpr, StrPred};
use bricks_rs::transfer::{StringEnv, StringEnvDomain, StringTransfer, TransferFunction};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Widest brick range kept before widening jumps to [0, ∞] (kI).
    #[clap(long, value_name = "INT", default_value = "10")]
    k_i: usize,

    /// Largest string set kept by widening (kS).
    #[clap(long, value_name = "INT", default_value = "20")]
    k_s: usize,

    /// Longest brick sequence kept by widening (kL).
    #[clap(long, value_name = "INT", default_value = "10")]
    k_l: usize,

    /// Enable debug logging.
    #[clap(short, long)]
    verbose: bool,
}

fn lit(s: &str) -> StrExpr<String> {
    StrExpr::literal(s)
}

fn var(name: &str) -> StrExpr<String> {
    StrExpr::var(name)
}

/// Condition the analysis cannot decide.
fn unknown() -> StrPred<String> {
    StrExpr::Input.contains(lit("?"))
}

fn run(title: &str, source: &[&str], program: &Stmt<String>, domain: &StringEnvDomain) -> color_eyre::Result<StringEnv> {
    println!("{}", title);
    println!("{}", "-".repeat(title.len()));
    println!("Program:");
    for line in source {
        println!("  {}", line);
    }

    let env = StringTransfer::new().apply(domain, &StringEnv::new(), program)?;
    println!("Result: {}", env);
    println!();
    Ok(env)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let thresholds = Thresholds::new(args.k_i, args.k_s, args.k_l);
    let domain = StringEnvDomain::new(thresholds);
    log::info!("Thresholds: {:?}", thresholds);

    println!("=== Bricks String Analysis ===\n");

    let greeting = Stmt::seq([
        Stmt::if_then_else(unknown(), Stmt::assign("name", lit("Alice")), Stmt::assign("name", lit("Bob"))),
        Stmt::assign("msg", lit("Hello, ").concat(var("name")).concat(lit("!"))),
    ]);
    let env = run(
        "Example 1: Branches",
        &["if (*) name = \"Alice\" else name = \"Bob\"", "msg = \"Hello, \" + name + \"!\""],
        &greeting,
        &domain,
    )?;
    for needle in ["!", "A", "z"] {
        let pred = var("msg").contains(lit(needle));
        println!("msg contains {:?}: {}", needle, domain.satisfies(&env, &pred));
    }
    println!();

    let slicing = Stmt::seq([
        Stmt::assign("word", lit("abstraction")),
        Stmt::assign("prefix", var("word").substring(0, 8)),
        Stmt::assign("tail", var("word").substring(4, 40)),
    ]);
    run(
        "Example 2: Substrings",
        &["word = \"abstraction\"", "prefix = word[0..8]", "tail = word[4..40]"],
        &slicing,
        &domain,
    )?;

    let looping = Stmt::seq([
        Stmt::assign("path", lit("/")),
        Stmt::while_loop(unknown(), Stmt::assign("path", var("path").concat(lit("dir/")))),
        Stmt::assign("file", var("path").concat(lit("file.txt"))),
    ]);
    let env = run(
        "Example 3: Loop",
        &["path = \"/\"", "while (*) path = path + \"dir/\"", "file = path + \"file.txt\""],
        &looping,
        &domain,
    )?;
    println!(
        "file contains '.': {}",
        domain.satisfies(&env, &var("file").contains(lit(".")))
    );
    println!(
        "file == \"/file.txt\": {}",
        domain.satisfies(&env, &var("file").eq(lit("/file.txt")))
    );
    println!();

    let a = Bricks::literal("ab");
    let b = Bricks::literal("cd");
    println!("Example 4: Lattice operations");
    println!("-----------------------------");
    println!("{} ⊔ {} = {}", a, b, a.lub(&b));
    println!("{} ∇ {} = {}", a, b, a.widening(&b, &thresholds)?);

    Ok(())
}
