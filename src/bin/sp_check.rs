//! `sp_check`: the recogniser-authenticator binary (§6.4 of SPEC_FULL.md).
//!
//! Reads a graph file (§6.1), runs C3 -> C4 -> C5 via [`sp_cert::decide`],
//! authenticates the resulting certificate against the freshly read graph
//! (C6), and prints the one-line verdict. External-collaborator glue, not
//! part of the algorithmic core: this binary contributes no certificate-
//! relevant logic of its own.

use clap::Parser;

use sp_cert::{decide_and_authenticate, input, output};

/// Decide whether a graph is series-parallel and authenticate the verdict.
#[derive(Parser, Debug)]
#[command(name = "sp_check", about = "Series-parallel recognition with a checkable certificate")]
struct Args {
    /// Path to the input graph file (§6.1 grammar: `n e` then `e` `u v` lines).
    path: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let graph = match input::read_graph_file(&args.path) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match decide_and_authenticate(&graph) {
        Ok(cert) => {
            println!("{}", output::verdict_line(&cert));
            std::process::exit(0);
        }
        Err(failure) => {
            eprintln!("AUTH FAILED: {}", failure.sub_check);
            std::process::exit(1);
        }
    }
}
