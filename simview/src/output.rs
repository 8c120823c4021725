use serde::Serialize;
use simview_core::plotter::Sample;
use simview_core::{GuiSettings, ValueRange, VisibleWindow};

pub fn print_info(message: &str) {
    println!("[simview][INFO] {message}");
}

pub fn print_warning(message: &str) {
    eprintln!("[simview][WARN] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[simview][ERROR]: {message}");
}

#[derive(Serialize)]
struct SliceReport<'a> {
    window: VisibleWindow,
    first_index: usize,
    samples: &'a [Sample],
}

pub fn print_slice(
    window: VisibleWindow,
    first_index: usize,
    samples: &[Sample],
) -> Result<(), String> {
    let report = SliceReport {
        window,
        first_index,
        samples,
    };
    let text = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Failed to serialize slice: {e}"))?;
    println!("{text}");
    Ok(())
}

pub fn print_range(range: &ValueRange) {
    print_info(&format!("Valid range: min {} max {}", range.min(), range.max()));
}

pub fn print_settings(settings: &GuiSettings) {
    print_info("GUI settings:");
    println!("editor_width: {}", settings.editor_width);
    println!("console_height: {}", settings.console_height);
    println!("hide_editor: {}", settings.hide_editor);
    println!("editor_font_size: {}", settings.editor_font_size);
    println!("auto_update: {}", settings.auto_update);
}
