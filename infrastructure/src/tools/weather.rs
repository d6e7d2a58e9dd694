//! `weather_tool` — current weather from the OpenWeatherMap API.
//!
//! Needs an API key (`[tools.weather] api_key`); without one the tool
//! fails with `UNAVAILABLE` instead of calling out.

use async_trait::async_trait;
use rag_application::ports::tool_executor::ToolExecutorPort;
use rag_domain::tool::{
    entities::{ToolArguments, ToolParameter, ToolSpec},
    value_objects::{ToolError, ToolPayload},
};

pub const NAME: &str = "weather_tool";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub fn weather_definition() -> ToolSpec {
    ToolSpec::new(
        NAME,
        "Get the current weather for a city or region. \
         Examples: 'weather in Seoul', 'is it raining in London'.",
    )
    .with_parameter(ToolParameter::new(
        "location",
        "City or region name (e.g. 'Seoul', 'New York')",
        true,
    ))
}

/// Executor for `weather_tool`
pub struct WeatherExecutor {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherExecutor {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for WeatherExecutor {
    fn tool_name(&self) -> &str {
        NAME
    }

    async fn execute(&self, arguments: &ToolArguments) -> Result<ToolPayload, ToolError> {
        let location = arguments.require_str("location")?;
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ToolError::unavailable("Weather API key is not configured"));
        };

        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[("q", location), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Weather request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ToolError::not_found(format!("location '{}'", location)));
        }
        if !status.is_success() {
            return Err(ToolError::execution_failed(format!(
                "Weather API returned error: {}",
                status
            )));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Failed to parse weather data: {}", e)))?;

        Ok(ToolPayload::Text(format_weather(location, &data)))
    }
}

fn format_weather(location: &str, data: &serde_json::Value) -> String {
    let place = match (data["name"].as_str(), data["sys"]["country"].as_str()) {
        (Some(name), Some(country)) if !name.is_empty() => format!("{}, {}", name, country),
        (Some(name), _) if !name.is_empty() => name.to_string(),
        _ => location.to_string(),
    };

    let mut lines = vec![format!("Current weather in {}:", place)];

    if let Some(description) = data["weather"][0]["description"].as_str() {
        lines.push(format!("- Conditions: {}", description));
    }
    if let Some(temp) = data["main"]["temp"].as_f64() {
        match data["main"]["feels_like"].as_f64() {
            Some(feels) => lines.push(format!(
                "- Temperature: {:.1}°C (feels like {:.1}°C)",
                temp, feels
            )),
            None => lines.push(format!("- Temperature: {:.1}°C", temp)),
        }
    }
    if let Some(humidity) = data["main"]["humidity"].as_f64() {
        lines.push(format!("- Humidity: {}%", humidity));
    }
    if let Some(speed) = data["wind"]["speed"].as_f64() {
        lines.push(format!("- Wind: {} m/s", speed));
    }

    lines.join("\n")
}
