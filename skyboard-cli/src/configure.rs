use anyhow::{Context, Result};
use inquire::{Confirm, CustomType, Select};
use skyboard_core::{ClockStyle, Config, UnitSystem};

/// Interactive configuration; saves to the platform config file.
pub fn run() -> Result<()> {
    let mut cfg = Config::load()?;

    let units = Select::new("Units:", UnitSystem::all().to_vec())
        .with_starting_cursor(if cfg.units == UnitSystem::Imperial { 1 } else { 0 })
        .prompt()
        .context("Failed to read unit system")?;
    cfg.set_units(units);

    let clock = Select::new("Sunrise/sunset clock:", vec!["24h", "12h"])
        .with_starting_cursor(if cfg.clock == ClockStyle::TwelveHour { 1 } else { 0 })
        .prompt()
        .context("Failed to read clock style")?;
    cfg.clock = if clock == "12h" { ClockStyle::TwelveHour } else { ClockStyle::TwentyFourHour };

    let set_home = Confirm::new("Set a home location for `skyboard show`?")
        .with_default(cfg.home.is_none())
        .prompt()
        .context("Failed to read answer")?;
    if set_home {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number, e.g. 40.71")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number, e.g. -74.01")
            .prompt()
            .context("Failed to read longitude")?;
        cfg.upsert_home(latitude, longitude);
    } else {
        cfg.share_location = Confirm::new("Allow `skyboard show` to use the saved location?")
            .with_default(cfg.share_location)
            .prompt()
            .context("Failed to read answer")?;
    }

    cfg.panels.hourly = confirm("Show the hourly strip?", cfg.panels.hourly)?;
    cfg.panels.visibility = confirm("Show visibility?", cfg.panels.visibility)?;
    cfg.panels.uv_index = confirm("Show the UV index?", cfg.panels.uv_index)?;
    cfg.panels.alerts = confirm("Show weather advisories (US only)?", cfg.panels.alerts)?;

    cfg.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

fn confirm(message: &str, default: bool) -> Result<bool> {
    Confirm::new(message)
        .with_default(default)
        .prompt()
        .with_context(|| format!("Failed to read answer to '{message}'"))
}
