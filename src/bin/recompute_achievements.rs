//! Recompute the cached achievement state from the stored records
//! Usage: cargo run --bin recompute_achievements

use chrono::Local;
use tracing_subscriber::EnvFilter;

use calorie_tracker::config;
use calorie_tracker::tools::achievements;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("calorie_tracker=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let database = config::open_database()?;
    let today = Local::now().date_naive();

    let state = achievements::refresh_achievements(&database, today, &Local)?;
    let report = achievements::achievement_report(&database, today, &Local)?;

    println!("Achievements as of {}:", today);
    println!("  Streak: {} days", state.streak);
    println!("  Total entries: {}", state.total_entries);
    println!("  Perfect days: {}", state.perfect_days);
    println!("  Level: {} ({})", state.level, report.tier_name);
    println!(
        "  Unlocked: {}/{}",
        report.unlocked_count,
        report.achievements.len()
    );
    for achievement in report.achievements.iter().filter(|a| a.unlocked) {
        println!("    - {}: {}", achievement.title, achievement.description);
    }

    Ok(())
}
