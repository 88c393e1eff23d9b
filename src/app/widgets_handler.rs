//! Weather, prices, calendar and widget visibility

use std::time::Instant;

use chrono::Local;

use crate::event::Panel;
use crate::remote::{RemoteRequest, RemoteResponse, ASSETS};
use crate::ui::components::calendar::shift_month;
use crate::ui::MessageType;

use super::App;

impl App {
    pub(crate) fn toggle_widget(&mut self, panel: Panel) {
        let visible = self.visibility.toggle(panel);
        tracing::debug!(?panel, visible, "widget toggled");
        if visible && panel == Panel::Prices {
            if let Some(index) = self.prices.selected {
                self.request_price(index);
            }
        }
    }

    /// Entering blackout ends any edit and blurs, which dismisses the keyboard
    pub(crate) fn toggle_blackout(&mut self) {
        self.blackout = !self.blackout;
        tracing::debug!(blackout = self.blackout, "blackout toggled");
        if self.blackout {
            if self.editing.is_some() {
                self.cancel_edit();
            }
            self.move_focus(None);
            self.swipe = None;
        }
    }

    pub(crate) fn shift_calendar(&mut self, delta: i32) {
        self.calendar_month = shift_month(self.calendar_month, delta);
    }

    /// Selecting the selected asset again clears the selection
    pub(crate) fn select_asset(&mut self, index: usize) {
        if index >= ASSETS.len() {
            return;
        }
        if self.prices.selected == Some(index) {
            self.prices.selected = None;
            self.prices.loading = false;
            self.prices.error = None;
            return;
        }
        self.prices.selected = Some(index);
        self.prices.error = None;
        self.request_price(index);
    }

    fn request_price(&mut self, index: usize) {
        let Some(remote) = self.remote.as_ref() else { return };
        let asset_id = ASSETS[index].id.to_string();
        tracing::debug!(%asset_id, "price requested");
        self.prices.loading = remote.request(RemoteRequest::Price(asset_id));
        self.timers.price = Some(Instant::now());
    }

    /// Configuration errors stop further requests
    pub(crate) fn request_weather(&mut self) {
        if self.weather.fatal {
            return;
        }
        let Some(remote) = self.remote.as_ref() else { return };
        tracing::debug!("weather requested");
        self.weather.loading = remote.request(RemoteRequest::Weather);
        self.timers.weather = Some(Instant::now());
    }

    pub(crate) fn refresh_weather(&mut self) {
        match self.weather.error.clone() {
            Some(err) if self.weather.fatal => self.set_message(&err, MessageType::Warning),
            _ => self.request_weather(),
        }
    }

    pub(crate) fn drain_remote(&mut self) {
        let Some(remote) = self.remote.as_ref() else { return };
        let responses = remote.drain();
        for response in responses {
            self.apply_remote(response);
        }
    }

    pub(crate) fn apply_remote(&mut self, response: RemoteResponse) {
        match response {
            RemoteResponse::Weather(Ok(report)) => {
                self.weather.loading = false;
                self.weather.error = None;
                self.weather.report = Some(report);
            }
            RemoteResponse::Weather(Err(e)) => {
                tracing::warn!(error = %e, "weather fetch failed");
                self.weather.loading = false;
                self.weather.fatal = !e.is_retryable();
                self.weather.error = Some(e.to_string());
                if !self.weather.fatal {
                    self.set_message("Weather update failed", MessageType::Warning);
                }
            }
            RemoteResponse::Price { asset_id, result } => {
                let current = self.prices.selected.is_some_and(|i| ASSETS[i].id == asset_id);
                if current {
                    self.prices.loading = false;
                }
                match result {
                    Ok(quote) => {
                        self.prices.quotes.insert(asset_id, quote);
                        if current {
                            self.prices.error = None;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(%asset_id, error = %e, "price fetch failed");
                        if current {
                            self.prices.error = Some(e.to_string());
                        }
                    }
                }
            }
        }
    }

    /// Clock, weather and price refresh
    pub(crate) fn advance_timers(&mut self, now: Instant) {
        if now.duration_since(self.timers.clock) >= self.config.clock_tick {
            self.now = Local::now();
            self.timers.clock = now;
        }

        let weather_due = self
            .timers
            .weather
            .is_some_and(|at| now.duration_since(at) >= self.config.weather_refresh);
        if weather_due {
            self.request_weather();
        }

        let price_due = self
            .timers
            .price
            .is_some_and(|at| now.duration_since(at) >= self.config.price_refresh);
        if let (true, Some(index)) = (price_due, self.prices.selected) {
            self.request_price(index);
        }
    }
}
