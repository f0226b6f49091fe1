use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use nt_core::{MechanismSpec, Registry};

pub fn run(registry: &Registry, json: bool) -> Result<(), String> {
    if json {
        let specs: Vec<&MechanismSpec> = registry.iter().map(|d| d.spec()).collect();
        let out = serde_json::to_string_pretty(&specs).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Id",
        "Name",
        "Parameters",
        "States",
        "Assigned",
        "Jacobian",
    ]);

    for desc in registry.iter() {
        let spec = desc.spec();
        let params: Vec<&str> = spec.parameters.iter().map(|p| p.name.as_str()).collect();
        let states: Vec<String> = spec
            .states
            .iter()
            .map(|s| format!("{} ({})", s.name, s.kind))
            .collect();
        table.add_row(vec![
            desc.id().to_string(),
            desc.name().to_string(),
            params.join(", "),
            states.join(", "),
            spec.assigned.join(", "),
            if desc.mechanism().provides_jacobian() {
                "yes".to_string()
            } else {
                "no".to_string()
            },
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} mechanism types registered",
        registry.len().to_string().bold()
    );
    Ok(())
}
