use simview_core::settings::{ConfigContext, ConfigKey, GuiSettings, JsonFileStore};

#[test]
fn file_store_persists_across_contexts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("gui.json");

    let config = ConfigContext::new(JsonFileStore::open(&path).expect("open store"));
    config.set_editor_width(420.0).expect("set width");
    config
        .set_value(ConfigKey::AutoUpdate, "false")
        .expect("set auto update");
    assert!(path.exists());

    let reloaded = ConfigContext::new(JsonFileStore::open(&path).expect("reopen store"));
    assert_eq!(reloaded.editor_width(), 420.0);
    assert!(!reloaded.auto_update());
    assert_eq!(reloaded.console_height(), GuiSettings::default().console_height);
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("gui.json");
    std::fs::write(&path, b"[1, 2").expect("write");
    assert!(JsonFileStore::open(&path).is_err());
}

#[test]
fn subscribers_only_hear_real_changes() {
    let config = ConfigContext::in_memory();
    let first = config.subscribe();
    let second = config.subscribe();

    config.set_console_height(150.0).unwrap();
    config.set_console_height(150.0).unwrap();
    config.set_hide_editor(true).unwrap();

    assert_eq!(
        first.drain(),
        vec![ConfigKey::ConsoleHeight, ConfigKey::HideEditor]
    );
    assert_eq!(second.try_next(), Some(ConfigKey::ConsoleHeight));
    assert_eq!(second.try_next(), Some(ConfigKey::HideEditor));
    assert_eq!(second.try_next(), None);
}

#[test]
fn dropped_subscription_stops_receiving() {
    let config = ConfigContext::in_memory();
    let kept = config.subscribe();
    drop(config.subscribe());

    config.set_editor_font_size(14).unwrap();
    assert_eq!(kept.drain(), vec![ConfigKey::EditorFontSize]);
}

#[test]
fn failed_write_keeps_previous_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sub").join("gui.json");
    let config = ConfigContext::new(JsonFileStore::open(&path).expect("open store"));
    let changes = config.subscribe();

    // a plain file where the settings directory should go
    std::fs::write(dir.path().join("sub"), b"").expect("write blocker");
    assert!(config.set_editor_font_size(20).is_err());

    assert_eq!(
        config.editor_font_size(),
        GuiSettings::default().editor_font_size
    );
    assert!(changes.drain().is_empty());
}
