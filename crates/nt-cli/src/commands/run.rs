use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nt_core::{Compartment, CompartmentId, CompartmentTable, Registry};
use nt_engine::{DispatchEngine, DivergencePolicy, Solver, SolverConfig};

/// Options for the demo run, straight from the CLI flags.
pub struct RunOptions {
    pub steps: u64,
    pub dt: f64,
    pub compartments: usize,
    pub stim: f64,
    pub noise: f64,
    pub seed: u64,
    pub halt_on_divergence: bool,
    pub output: Option<PathBuf>,
}

pub fn run(registry: Registry, opts: RunOptions) -> Result<(), String> {
    if opts.compartments == 0 {
        return Err("at least one compartment is required".into());
    }

    // Build the model: every roster mechanism in every compartment.
    let mut engine = DispatchEngine::new(registry);
    let mut table = CompartmentTable::new();
    let ids: Vec<CompartmentId> = (0..opts.compartments)
        .map(|_| table.add(-65.0, Compartment::default()))
        .collect();
    let mechanism_ids: Vec<_> = engine.registry().iter().map(|d| d.id()).collect();
    for compartment in &ids {
        for mech in &mechanism_ids {
            engine
                .insert(*mech, *compartment)
                .map_err(|e| format!("model build failed: {e}"))?;
        }
    }

    let policy = if opts.halt_on_divergence {
        DivergencePolicy::Halt
    } else {
        DivergencePolicy::Report
    };
    let config = SolverConfig::default().with_dt(opts.dt).with_policy(policy);
    let mut solver = Solver::new(engine, table, config);
    solver.init();

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let stimulated = ids[0];

    let mut spikes = vec![0_u64; opts.compartments];
    let mut above = vec![false; opts.compartments];
    let mut v_min = vec![f64::MAX; opts.compartments];
    let mut v_max = vec![f64::MIN; opts.compartments];
    let mut divergences = 0_usize;

    for _ in 0..opts.steps {
        let noise = if opts.noise > 0.0 {
            rng.random_range(-opts.noise..=opts.noise)
        } else {
            0.0
        };
        solver.set_stimulus(stimulated, opts.stim + noise);

        let report = solver
            .step()
            .map_err(|e| format!("simulation error: {e}"))?;
        if !report.is_empty() {
            divergences += report.len();
            for d in report.divergences() {
                let name = solver
                    .engine()
                    .registry()
                    .get(d.mechanism)
                    .map_or("?", |m| m.name());
                eprintln!(
                    "  {} {name}[{}] {} on {} went non-finite",
                    "WARN".yellow().bold(),
                    d.instance,
                    d.field,
                    d.compartment
                );
            }
        }

        for (idx, id) in ids.iter().enumerate() {
            let v = solver.voltage(*id);
            v_min[idx] = v_min[idx].min(v);
            v_max[idx] = v_max[idx].max(v);
            if v > 0.0 && !above[idx] {
                spikes[idx] += 1;
            }
            above[idx] = v > 0.0;
        }
    }

    // Header
    println!(
        "  {} {}",
        "Demo run".bold(),
        format!(
            "({} steps, dt={} ms, stim={} µA/cm² into cmp0, seed={})",
            opts.steps, opts.dt, opts.stim, opts.seed
        )
        .dimmed()
    );
    println!(
        "  {} compartments, {} mechanism instances, {:.1} ms simulated",
        opts.compartments,
        solver.engine().instance_count(),
        solver.time()
    );
    if divergences > 0 {
        println!(
            "  {} {divergences} non-finite evaluation(s) reported",
            "WARN".yellow().bold()
        );
    }
    println!();

    // Per-compartment table
    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec![
        "Compartment",
        "Final V (mV)",
        "Min V",
        "Max V",
        "Spikes",
    ]);
    for (idx, id) in ids.iter().enumerate() {
        out.add_row(vec![
            id.to_string(),
            format!("{:.2}", solver.voltage(*id)),
            format!("{:.2}", v_min[idx]),
            format!("{:.2}", v_max[idx]),
            spikes[idx].to_string(),
        ]);
    }
    println!("{out}");

    if let Some(path) = &opts.output {
        let finals: Vec<f64> = ids.iter().map(|id| solver.voltage(*id)).collect();
        let summary = serde_json::json!({
            "steps": opts.steps,
            "dt": opts.dt,
            "compartments": opts.compartments,
            "stim": opts.stim,
            "seed": opts.seed,
            "final_voltages": finals,
            "spikes": spikes,
            "divergences": divergences,
        });
        let text =
            serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
        std::fs::write(path, text).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        println!();
        println!("  Wrote summary to {}", path.display());
    }

    Ok(())
}
