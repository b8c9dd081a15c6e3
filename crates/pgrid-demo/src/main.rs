#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = pgrid_demo::run_from_env() {
        eprintln!("pgrid-demo: {error}");
        std::process::exit(error.exit_code());
    }
}
