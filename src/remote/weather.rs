//! Weather client
//!
//! Current conditions plus a daily forecast from OpenWeatherMap, in imperial
//! units.

use chrono::{DateTime, TimeZone};
use serde::Deserialize;

use super::HttpClient;
use crate::error::{DashboardError, DashboardResult};

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const MAX_FORECAST_DAYS: usize = 7;

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    main: Main,
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
pub struct ForecastItem {
    dt: i64,
    main: Main,
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherData {
    pub date: String,
    pub temp: i64,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: i64,
}

impl WeatherData {
    fn from_parts(date: String, main: &Main, weather: &[Condition], wind: &Wind) -> Self {
        let (description, icon) = weather
            .first()
            .map(|c| (c.description.clone(), c.icon.clone()))
            .unwrap_or_default();
        Self {
            date,
            temp: main.temp.round() as i64,
            description,
            icon,
            humidity: main.humidity,
            wind_speed: wind.speed.round() as i64,
        }
    }

    /// Terminal glyph for the OpenWeatherMap icon code
    pub fn glyph(&self) -> &'static str {
        match self.icon.get(..2).unwrap_or("") {
            "01" => "☀",
            "02" => "⛅",
            "03" | "04" => "☁",
            "09" | "10" => "🌧",
            "11" => "⛈",
            "13" => "❄",
            "50" => "🌫",
            _ => "·",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: WeatherData,
    pub forecast: Vec<WeatherData>,
}

pub trait WeatherSource {
    fn fetch(&self) -> DashboardResult<WeatherReport>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: HttpClient,
    api_key: Option<String>,
    city: String,
    country: String,
}

impl OpenWeatherClient {
    pub fn new(http: HttpClient, api_key: Option<String>, city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            city: city.into(),
            country: country.into(),
        }
    }

    fn location(&self) -> String {
        format!("{},{}", self.city, self.country)
    }
}

impl WeatherSource for OpenWeatherClient {
    fn fetch(&self) -> DashboardResult<WeatherReport> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(DashboardError::config("Weather API key is not configured"));
        };
        let location = self.location();
        let query = [("q", location.as_str()), ("units", "imperial"), ("appid", key)];

        let current: CurrentResponse =
            self.http.get_json("current weather", &format!("{}/weather", BASE_URL), &query)?;
        let forecast: ForecastResponse =
            self.http.get_json("weather forecast", &format!("{}/forecast", BASE_URL), &query)?;

        Ok(WeatherReport {
            current: WeatherData::from_parts("Now".to_string(), &current.main, &current.weather, &current.wind),
            forecast: reduce_forecast(&forecast.list, &chrono::Local),
        })
    }
}

/// Keeps the first entry of each calendar day in `tz`, at most a week of them
pub fn reduce_forecast<Tz: TimeZone>(items: &[ForecastItem], tz: &Tz) -> Vec<WeatherData>
where
    Tz::Offset: std::fmt::Display,
{
    let mut days = Vec::new();
    let mut last_day = None;

    for item in items {
        let Some(at) = DateTime::from_timestamp(item.dt, 0) else {
            continue;
        };
        let local = at.with_timezone(tz);
        let day = local.date_naive();
        if last_day == Some(day) {
            continue;
        }
        last_day = Some(day);

        let label = local.format("%a").to_string();
        days.push(WeatherData::from_parts(label, &item.main, &item.weather, &item.wind));
        if days.len() == MAX_FORECAST_DAYS {
            break;
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(dt: i64, temp: f64) -> ForecastItem {
        ForecastItem {
            dt,
            main: Main { temp, humidity: 40 },
            weather: vec![Condition { description: "clear sky".into(), icon: "01d".into() }],
            wind: Wind { speed: 4.6 },
        }
    }

    // 2024-01-01 00:00:00 UTC, a Monday
    const MONDAY: i64 = 1_704_067_200;

    #[test]
    fn test_forecast_keeps_first_entry_per_day() {
        let items: Vec<ForecastItem> = (0..40).map(|i| item(MONDAY + i * 3 * 3600, i as f64 + 0.4)).collect();
        let days = reduce_forecast(&items, &Utc);

        assert_eq!(days.len(), 5);
        let labels: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!(days[1].temp, 8);
        assert_eq!(days[0].wind_speed, 5);
    }

    #[test]
    fn test_forecast_caps_at_seven_days() {
        let items: Vec<ForecastItem> = (0..10).map(|i| item(MONDAY + i * 86_400, 70.0)).collect();
        assert_eq!(reduce_forecast(&items, &Utc).len(), MAX_FORECAST_DAYS);
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let client = OpenWeatherClient::new(HttpClient::new().unwrap(), Some("  ".into()), "West Covina", "US");
        let err = client.fetch().unwrap_err();
        assert_eq!(err.to_string(), "Weather API key is not configured");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_current_response_decodes() {
        let json = r#"{
            "main": {"temp": 71.6, "humidity": 52, "feels_like": 70.1},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "wind": {"speed": 3.44, "deg": 270},
            "name": "West Covina"
        }"#;
        let parsed: CurrentResponse = serde_json::from_str(json).unwrap();
        let data = WeatherData::from_parts("Now".into(), &parsed.main, &parsed.weather, &parsed.wind);
        assert_eq!(data.temp, 72);
        assert_eq!(data.wind_speed, 3);
        assert_eq!(data.glyph(), "☀");
    }
}
