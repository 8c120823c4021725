use connection::{ConnectionConfig, ConnectionFactory};
use simview_core::plotter::{Sample, SimilarityPlot, ValuePlot};
use simview_core::protocol::encode_sample;
use simview_core::sync::VirtualClock;
use simview_core::{ConfigContext, EditorSession, PlotError, SimClient, TimeSlider};

fn client() -> SimClient<VirtualClock> {
    let config = ConfigContext::in_memory();
    config.set_auto_update(false).unwrap();
    let editor = EditorSession::new(
        config,
        ConnectionFactory::create(&ConnectionConfig::default()),
        VirtualClock::new(),
        1280.0,
        720.0,
    );
    let mut client = SimClient::new(editor);
    client.register_plot("value", Box::new(ValuePlot::value("x", 1)));
    client.register_plot(
        "similarity",
        Box::new(SimilarityPlot::similarity("s", vec!["A".into(), "B".into()])),
    );
    client
}

#[test]
fn routes_binary_data_by_uid() {
    let mut client = client();
    let bytes = encode_sample(&Sample::new(0.1, vec![0.5]));
    assert!(client.on_binary("value", &bytes).unwrap());
    assert!(matches!(
        client.on_binary("missing", &bytes),
        Err(PlotError::UnknownPlot(_))
    ));
    // wrong width for the two-pointer similarity plot
    assert!(client.on_binary("similarity", &bytes).is_err());
}

#[test]
fn redraw_only_touches_changed_plots() {
    let mut client = client();
    client.set_slider(TimeSlider::new(0.0, 1.0));
    client
        .on_binary("value", &encode_sample(&Sample::new(0.2, vec![0.5])))
        .unwrap();

    let frames = client.redraw();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].0, "value");
    assert_eq!(frames[0].1.lines[0].points.len(), 1);
    assert!(client.redraw().is_empty());
    assert_eq!(client.redraw_all().len(), 2);
}

#[test]
fn new_run_resets_every_plot() {
    let mut client = client();
    client.set_slider(TimeSlider::new(0.0, 1.0));
    client
        .on_binary("value", &encode_sample(&Sample::new(0.2, vec![0.5])))
        .unwrap();
    client.reset_all();
    let frames = client.redraw_all();
    assert!(frames
        .iter()
        .all(|(_, frame)| frame.lines.iter().all(|line| line.points.is_empty())));
}

#[test]
fn text_messages_reach_the_editor() {
    let mut client = client();
    client
        .on_text(r#"{"type":"editor.code","code":"import nengo"}"#)
        .unwrap();
    assert_eq!(client.editor().buffer(), "import nengo");
    client.teardown();
    assert_eq!(client.plot_ids().count(), 0);
}
