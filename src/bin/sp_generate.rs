//! `sp_generate`: the random-graph generator CLI (§6.3 of SPEC_FULL.md).
//!
//! Emits the union of `nC` cycles of length `lC` and `nK` complete graphs of
//! size `lK`, linked into a tree with 2 or 3 cross edges per link, then
//! shuffled. External collaborator, not part of the algorithmic core: this
//! binary only produces input files for [`sp_cert::decide`] to consume.
//!
//! Mirrors the original generator's positional argument contract
//! (`nC lC nK lK three_edges [seed]`), reproduced here as positional
//! `clap` arguments.

use clap::Parser;

use sp_cert::generator::{generate, GeneratorParams};
use sp_cert::output;

/// Generate a graph that is a tree-linked union of cycles and cliques.
#[derive(Parser, Debug)]
#[command(name = "sp_generate", about = "Random series-parallel-adjacent graph generator")]
struct Args {
    /// Number of cycles to generate.
    n_cycles: u64,
    /// Length of each cycle (>= 3).
    cycle_len: u64,
    /// Number of complete graphs (cliques) to generate.
    n_cliques: u64,
    /// Size of each clique (>= 3).
    clique_len: u64,
    /// Whether each link between subgraphs uses 3 cross edges instead of 2.
    /// Any nonzero value is treated as true, matching the original `atol`
    /// truthiness of `three_edges`.
    three_edges: u64,
    /// Random seed. If omitted, a seed is drawn from the system clock,
    /// matching the original's `time(0)` fallback when `argv[6]` is absent.
    seed: Option<u64>,
}

fn fallback_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let params = GeneratorParams {
        n_cycles: args.n_cycles,
        cycle_len: args.cycle_len,
        n_cliques: args.n_cliques,
        clique_len: args.clique_len,
        three_edges: args.three_edges != 0,
        seed: args.seed.unwrap_or_else(fallback_seed),
    };

    match generate(&params) {
        Ok((n, edges)) => print!("{}", output::format_graph(n, &edges)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
