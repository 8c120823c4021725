use crate::commands::*;
use crate::output::*;
use simview_core::plotter::{Sample, WindowedDataStore};
use simview_core::settings::JsonFileStore;
use simview_core::{ConfigContext, ConfigKey, StoreError, TimeSlider, Validator};
use std::path::Path;

pub fn handle_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Slice {
            input,
            start,
            span,
            margin,
        } => handle_slice(&input, start, span, margin),
        Commands::Range { text } => {
            let range = Validator::parse_range(&text)?;
            print_range(&range);
            Ok(())
        }
        Commands::Config { file, command } => handle_config_command(&file, command),
    }
}

fn handle_slice(
    input: &Path,
    start: f64,
    span: f64,
    margin: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    if !start.is_finite() {
        return Err("start must be a finite number".into());
    }
    if !span.is_finite() || span < 0.0 {
        return Err("span must be a non-negative number".into());
    }
    if !margin.is_finite() || margin < 0.0 {
        return Err("margin must be a non-negative number".into());
    }
    let slider = TimeSlider::new(start, span).with_retention_margin(margin);
    let mut store = load_samples(input)?;
    let evicted = store.evict_before(slider.retention_start());
    log::debug!("evicted {evicted} samples before t={}", slider.retention_start());

    let window = slider.visible_window();
    let slice = store.visible_slice(window.start, window.end);
    print_slice(window, slice.first_index(), &slice.to_vec())?;
    Ok(())
}

/// Reads `[t, v0, v1, ...]` rows. The first row fixes the dimension count;
/// rows arriving out of time order are reported and skipped.
pub fn load_samples(path: &Path) -> Result<WindowedDataStore, String> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read sample file '{}': {e}", path.display()))?;
    let mut store: Option<WindowedDataStore> = None;
    for (idx, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: Vec<f64> = serde_json::from_str(line)
            .map_err(|e| format!("Line {}: expected [t, values...]: {e}", idx + 1))?;
        let Some((time, values)) = row.split_first() else {
            return Err(format!("Line {}: empty row", idx + 1));
        };
        let store = store.get_or_insert_with(|| WindowedDataStore::new(values.len()));
        match store.push(Sample::new(*time, values.to_vec())) {
            Ok(()) => {}
            Err(err @ StoreError::OrderViolation { .. }) => {
                print_warning(&format!("Line {}: {err}; sample skipped", idx + 1));
            }
            Err(err) => return Err(format!("Line {}: {err}", idx + 1)),
        }
    }
    Ok(store.unwrap_or_else(|| WindowedDataStore::new(0)))
}

fn handle_config_command(
    file: &Path,
    command: ConfigCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::open(file).map_err(|e| {
        format!("Failed to open settings file '{}': {e}", file.display())
    })?;
    let config = ConfigContext::new(store);
    match command {
        ConfigCommands::Show => print_settings(&config.snapshot()),
        ConfigCommands::Get { key } => {
            let key: ConfigKey = key.parse()?;
            println!("{}", config.get_value(key));
        }
        ConfigCommands::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            config
                .set_value(key, &value)
                .map_err(|e| format!("Failed to update setting: {e}"))?;
            print_info(&format!("{key} = {}", config.get_value(key)));
        }
    }
    Ok(())
}
