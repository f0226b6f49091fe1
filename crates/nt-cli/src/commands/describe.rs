use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use nt_core::Registry;

pub fn run(registry: &Registry, name: &str, json: bool) -> Result<(), String> {
    let id = registry.lookup(name).map_err(|e| e.to_string())?;
    let desc = registry
        .get(id)
        .ok_or_else(|| format!("mechanism not found: \"{name}\""))?;
    let spec = desc.spec();

    if json {
        let out = serde_json::to_string_pretty(spec).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {}",
        desc.name().bold(),
        format!(
            "({}, {})",
            desc.id(),
            if desc.mechanism().provides_jacobian() {
                "contributes Jacobian"
            } else {
                "no Jacobian"
            }
        )
        .dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Class", "Field", "Detail"]);
    for p in &spec.parameters {
        table.add_row(vec![
            "parameter".to_string(),
            p.name.clone(),
            format!("default {}", p.default),
        ]);
    }
    for s in &spec.states {
        table.add_row(vec![
            "state".to_string(),
            s.name.clone(),
            format!("{} update", s.kind),
        ]);
    }
    for a in &spec.assigned {
        table.add_row(vec![
            "assigned".to_string(),
            a.clone(),
            "recomputed each step".to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
