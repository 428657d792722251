use blood_logistics::error::SimulationError;
use blood_logistics::io::reporting;
use blood_logistics::io::scenario::load_scenario;
use blood_logistics::simulation::config::ScenarioConfig;
use blood_logistics::simulation::engine::BloodSupplySimulation;
use blood_logistics::simulation::kpis::generate_kpis;
use std::env;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SimulationError> {
    println!("=== Blood Product Logistics Simulation ===");

    // 1. SETUP CONFIGURATION
    // Usage: blood-logistics [scenario.json] [history.csv] [table.csv]
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => load_scenario(path)?,
        None => ScenarioConfig::default(),
    };
    let history_file = args.get(1).map_or("simulation_results.csv", String::as_str);
    let table_file = args.get(2).map_or("simulation_table.csv", String::as_str);
    let personnel: Vec<u32> = config.platoons.iter().map(|p| p.personnel).collect();

    // 2. INITIALIZE & RUN
    let mut sim = BloodSupplySimulation::new(config)?;
    println!("Running simulation for {} days...", sim.config().days);
    sim.run()?;

    // 3. EXPORT RESULTS
    reporting::write_simulation_log(history_file, &sim.history)?;
    let table = sim.result_table();
    reporting::write_result_table(table_file, &table)?;
    println!("Results written to ./{history_file} and ./{table_file}");

    // 4. PRINT ANALYSIS
    println!("\n=== Unmet Demand ===");
    for (platoon, unmet) in sim.unmet_breakdown() {
        println!("{platoon}: {unmet} pints");
    }
    println!("Total unmet: {} pints", sim.total_unmet());
    println!("Total expired at platoons: {} pints", sim.total_expired());

    let kpis = generate_kpis(&table, &personnel, 1.0);
    println!("\n=== KPI Summary ===");
    println!(
        " Average daily unmet demand per person: {:.2}",
        kpis.avg_unmet_demand_per_person
    );
    println!(
        " Average daily unmet demand above threshold per person: {:.2}",
        kpis.avg_unmet_demand_threshold_per_person
    );
    println!(
        " Average daily transport space used: {:.2}",
        kpis.avg_transport_space
    );
    println!(" Average daily expired units: {:.2}", kpis.avg_expired_units);

    println!("\nSimulation Complete.");
    Ok(())
}
