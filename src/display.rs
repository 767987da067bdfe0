use eframe::egui;
use log::{debug, info};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::Sender as TokioSender;

use crate::vitals::{Reading, Sample, SimulationState};


/// Everything a display needs to redraw after one tick.
/// Owned copies, so a display can never reach back into the loop's state.
#[derive(Debug, Clone, PartialEq)]
pub struct VitalsFrame {
    pub tick: u64,
    pub latest: Reading,
    pub heart_rate: Vec<Sample>,
    pub body_temp: Vec<Sample>,
}

impl VitalsFrame {
    pub fn capture(state: &SimulationState, latest: Reading) -> Self {
        VitalsFrame {
            tick: state.tick(),
            latest,
            heart_rate: state.heart_rate().to_vec(),
            body_temp: state.body_temp().to_vec(),
        }
    }

    pub fn heart_rate_label(&self) -> String {
        heart_rate_label(self.latest.heart_rate)
    }

    pub fn body_temp_label(&self) -> String {
        body_temp_label(self.latest.body_temp)
    }
}


pub trait VitalsDisplay: Send + 'static {
    fn render(&mut self, frame: VitalsFrame);
}


pub fn heart_rate_label(heart_rate: u32) -> String {
    format!("Heart Rate: {} bpm", heart_rate)
}

pub fn body_temp_label(body_temp: f64) -> String {
    // round half-up on tenths; plain {:.1} would print 36.55 as 36.5
    let tenths = (body_temp * 10.0).round() / 10.0;
    format!("{:.1} °C", tenths)
}

pub fn day_label(index: f64) -> String {
    format!("Day {}", index as i64)
}


/// Forwards frames to the GUI thread and wakes it up for a redraw.
pub struct ChannelDisplay {
    tx_to_gui: TokioSender<VitalsFrame>,
    ctx: Option<egui::Context>,
}

impl ChannelDisplay {
    pub fn new(tx_to_gui: TokioSender<VitalsFrame>, ctx: Option<egui::Context>) -> Self {
        ChannelDisplay {
            tx_to_gui,
            ctx,
        }
    }
}

impl VitalsDisplay for ChannelDisplay {
    fn render(&mut self, frame: VitalsFrame) {
        let tick = frame.tick;
        match self.tx_to_gui.try_send(frame) {
            Ok(()) => {}
            // next frame carries the full series again
            Err(TrySendError::Full(_)) => debug!("gui is behind, dropping frame for tick {tick}"),
            Err(TrySendError::Closed(_)) => debug!("gui is gone, dropping frame for tick {tick}"),
        }

        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }
}


/// Headless display: one log line per tick.
#[derive(Default)]
pub struct LogDisplay;

impl VitalsDisplay for LogDisplay {
    fn render(&mut self, frame: VitalsFrame) {
        info!(
            "{}: {}, {} ({} samples retained)",
            day_label(frame.tick as f64),
            frame.heart_rate_label(),
            frame.body_temp_label(),
            frame.heart_rate.len(),
        );
    }
}


#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn heart_rate_label_format() {
        assert_eq!(heart_rate_label(72), "Heart Rate: 72 bpm");
        assert_eq!(heart_rate_label(60), "Heart Rate: 60 bpm");
    }

    #[test]
    fn body_temp_label_rounds_to_one_decimal() {
        assert_eq!(body_temp_label(36.55), "36.6 °C");
        assert_eq!(body_temp_label(36.54), "36.5 °C");
        assert_eq!(body_temp_label(36.0), "36.0 °C");
        assert_eq!(body_temp_label(37.49), "37.5 °C");
    }

    #[test]
    fn day_label_uses_integer_index() {
        assert_eq!(day_label(1.0), "Day 1");
        assert_eq!(day_label(12.0), "Day 12");
    }

    #[test]
    fn frame_copies_state() {
        let mut state = SimulationState::new(0);
        let reading = Reading { heart_rate: 72, body_temp: 36.55 };
        state.record(reading);

        let frame = VitalsFrame::capture(&state, reading);
        assert_eq!(frame.tick, 1);
        assert_eq!(frame.heart_rate, vec![Sample::new(1, 72.0)]);
        assert_eq!(frame.body_temp, vec![Sample::new(1, 36.55)]);
        assert_eq!(frame.heart_rate_label(), "Heart Rate: 72 bpm");
        assert_eq!(frame.body_temp_label(), "36.6 °C");

        state.record(Reading { heart_rate: 90, body_temp: 37.0 });
        assert_eq!(frame.heart_rate.len(), 1);
    }

    #[test]
    fn channel_display_drops_frames_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut display = ChannelDisplay::new(tx, None);

        let mut state = SimulationState::new(0);
        for hr in [70, 71] {
            let reading = Reading { heart_rate: hr, body_temp: 36.5 };
            state.record(reading);
            display.render(VitalsFrame::capture(&state, reading));
        }

        let first = rx.try_recv().expect("first frame");
        assert_eq!(first.tick, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_display_survives_closed_gui() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let mut display = ChannelDisplay::new(tx, None);

        let mut state = SimulationState::new(0);
        let reading = Reading { heart_rate: 70, body_temp: 36.5 };
        state.record(reading);
        display.render(VitalsFrame::capture(&state, reading));
    }
}
