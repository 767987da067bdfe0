use std::ops::RangeInclusive;

use eframe::egui::{Color32, Label, RichText, Ui};
use egui_plot::{Corner, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::display::day_label;
use crate::vitals::{Sample, BODY_TEMP_SERIES, HEART_RATE_SERIES};


const HEART_RATE_COLOR: Color32 = Color32::from_rgb(0xCC, 0x00, 0x00);
const BODY_TEMP_COLOR: Color32 = Color32::from_rgb(0x00, 0x99, 0xCC);
const MARKER_RADIUS: f32 = 3.0;


pub fn get_heart_rate_label(text: &str) -> Label {
    let hr_text = RichText::new(text)
        .color(HEART_RATE_COLOR)
        .size(28.0);

    Label::new(hr_text)
}

pub fn get_body_temp_label(text: &str) -> Label {
    let temp_text = RichText::new(text)
        .color(BODY_TEMP_COLOR)
        .size(28.0);

    Label::new(temp_text)
}

pub fn get_waiting_label() -> Label {
    let text = RichText::new("Waiting for first reading...")
        .color(Color32::GRAY)
        .size(20.0);

    Label::new(text)
}

// Labels only on whole days, the chart moves in steps of one
fn format_day_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if mark.value.fract() != 0.0 || mark.value < 0.0 {
        return String::new();
    }
    day_label(mark.value)
}

fn to_plot_points(samples: &[Sample]) -> PlotPoints {
    samples.iter().map(|&sample| <[f64; 2]>::from(sample)).collect::<Vec<_>>().into()
}

pub fn show_vitals_chart(ui: &mut Ui, heart_rate: &[Sample], body_temp: &[Sample]) {
    let plot = Plot::new("vitals_chart")
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_formatter(format_day_axis)
        .allow_scroll(false);

    plot.show(ui, |plot_ui| {
        for (name, samples, color) in [
            (HEART_RATE_SERIES, heart_rate, HEART_RATE_COLOR),
            (BODY_TEMP_SERIES, body_temp, BODY_TEMP_COLOR),
        ] {
            plot_ui.line(Line::new(to_plot_points(samples)).color(color).name(name));
            plot_ui.points(
                Points::new(to_plot_points(samples))
                    .shape(MarkerShape::Circle)
                    .radius(MARKER_RADIUS)
                    .color(color)
                    .name(name),
            );
        }
    });
}
