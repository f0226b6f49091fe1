use colored::Colorize;
use nt_core::Registry;

/// Print the startup roster banner to stderr.
///
/// Gated on rank so only one process of a distributed run prints it, and
/// suppressible outright. Diagnostic only, not part of the registry's
/// correctness contract.
pub fn emit(registry: &Registry, suppress: bool, rank: u32) {
    if suppress || rank > 0 {
        return;
    }
    eprintln!("{}", "neurite mechanisms:".dimmed());
    let names: Vec<&str> = registry.iter().map(|d| d.name()).collect();
    eprintln!("  {}", names.join(" "));
}
