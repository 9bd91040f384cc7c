//! # mapcfg
//!
//! Command-line client for the mapcfg placement engine: arrange layers in the
//! layer menu, put tools into toolbar slots, pick which layers the search
//! picker offers and scope all of it to access groups.
//!
//! All real work happens in the `mapcfg` library; this binary parses
//! arguments, prints results and turns errors into exit codes.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
