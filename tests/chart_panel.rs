use egui::Color32;
use livegrid::chart::{auto_color, ChartPanel};
use livegrid::format::format_readout;
use livegrid::{channel_plot, LabelStyle, PlotCommand, PlotPoint};

#[test]
fn panel_registers_and_streams_points() {
    let (sink, rx) = channel_plot();
    let trace = sink.create_trace("Channel 3");
    let mut panel = ChartPanel::new(rx, 100, 0.0, Color32::RED);

    sink.send_points(
        &trace,
        vec![PlotPoint { x: -2.0, y: 5.0 }, PlotPoint { x: -1.0, y: 6.0 }],
    )
    .unwrap();
    panel.drain();

    assert_eq!(panel.name(), "Channel 3");
    assert_eq!(panel.trace_id(), Some(trace.id));
    assert_eq!(panel.buffer.latest_x(), Some(-1.0));

    // value batches continue where the points left off
    sink.send_values(&trace, vec![7.0]).unwrap();
    panel.drain();
    assert_eq!(panel.buffer.live.back(), Some(&[0.0, 7.0]));
}

#[test]
fn panel_ignores_foreign_traces() {
    let (sink, rx) = channel_plot();
    let trace = sink.create_trace("mine");
    let other = {
        let (other_sink, _other_rx) = channel_plot();
        other_sink.create_trace("theirs")
    };
    let mut panel = ChartPanel::new(rx, 100, 0.0, Color32::RED);

    // a command addressed to another trace id on this channel is dropped
    sink.send_values(&other, vec![1.0, 2.0]).unwrap();
    sink.set_label(&other, "9.9%", Some(LabelStyle::Positive)).unwrap();
    panel.drain();
    assert!(panel.buffer.live.is_empty());
    assert!(panel.label.is_none());
    assert_eq!(panel.trace_id(), Some(trace.id));
}

#[test]
fn label_updates_replace_previous_text() {
    let (sink, rx) = channel_plot();
    let trace = sink.create_trace("c");
    let mut panel = ChartPanel::new(rx, 10, 0.0, Color32::RED);

    sink.set_label(&trace, "1.0%", Some(LabelStyle::Positive)).unwrap();
    sink.set_label(&trace, "-0.4%", Some(LabelStyle::Negative)).unwrap();
    assert_eq!(panel.drain(), 3);
    let label = panel.label.clone().unwrap();
    assert_eq!(label.text, "-0.4%");
    assert_eq!(label.style, Some(LabelStyle::Negative));
}

#[test]
fn history_is_bounded_to_max_points() {
    let (sink, rx) = channel_plot();
    let trace = sink.create_trace("c");
    let mut panel = ChartPanel::new(rx, 5, 0.0, Color32::RED);

    let values: Vec<f64> = (0..12).map(f64::from).collect();
    sink.send_values(&trace, values).unwrap();
    panel.drain();
    let ys: Vec<f64> = panel.buffer.live.iter().map(|p| p[1]).collect();
    assert_eq!(ys, vec![7.0, 8.0, 9.0, 10.0, 11.0]);
}

#[test]
fn commands_are_plain_data() {
    let (sink, rx) = channel_plot();
    let trace = sink.create_trace("c");
    sink.send_values(&trace, vec![1.5]).unwrap();
    let cmds: Vec<PlotCommand> = rx.try_iter().collect();
    assert_eq!(
        cmds,
        vec![
            PlotCommand::RegisterTrace {
                id: trace.id,
                name: "c".into()
            },
            PlotCommand::Samples {
                trace_id: trace.id,
                y_values: vec![1.5]
            },
        ]
    );
}

#[test]
fn hover_readout_shows_age_and_value() {
    let text = format_readout("Channel 1", 8_766.0, 1234.5678, 10_000.0);
    assert_eq!(text, "Channel 1\n-00:00:01.234\nValue: 1234.57");
}

#[test]
fn grid_colors_are_distinct() {
    let colors: Vec<Color32> = (0..9).map(|i| auto_color(i, 9)).collect();
    for (i, a) in colors.iter().enumerate() {
        for b in &colors[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
