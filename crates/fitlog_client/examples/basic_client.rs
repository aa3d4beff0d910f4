use fitlog_client::config::Config;
use fitlog_client::{FitnessServices, observability};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_logging();

    // Example: expects FITLOG_FIREBASE_API_KEY and FITLOG_FIREBASE_PROJECT_ID in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let user_id = std::env::args().nth(1).unwrap_or_else(|| "demo-user".into());

    let services = FitnessServices::connect(&cfg.store)?;
    match services.profiles().get(&user_id).await? {
        Some(profile) => println!(
            "{} ({} years, {:?})",
            profile.name, profile.age, profile.fitness_level
        ),
        None => println!("no profile for {user_id}"),
    }

    if let Some(sim) = services.simulations().get_latest(&user_id).await? {
        println!("latest simulation {} on {}", sim.id, sim.date);
        for (group, level) in &sim.muscle_groups {
            println!("  {:<10} {level:.0}", group.as_str());
        }
    }
    Ok(())
}
