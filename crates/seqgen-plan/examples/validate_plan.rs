//! Check a `.json` or `.toml` plan and print every issue found.
//!
//! `cargo run -p seqgen-plan --example validate_plan -- plans/examples/letters.plan.toml`

use std::path::PathBuf;

use seqgen_plan::{load_plan, validate_plan_semantics};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: validate_plan <plan.json|plan.toml>")?;

    let plan = load_plan(&path)?;
    let report = validate_plan_semantics(&plan);

    for issue in report.errors.iter().chain(&report.warnings) {
        println!("{:?}: {issue}", issue.severity);
    }
    if !report.is_ok() {
        std::process::exit(1);
    }
    println!("{} is valid", path.display());
    Ok(())
}
