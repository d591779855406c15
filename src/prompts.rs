use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    /// Substituted when an optional argument is not supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub template: &'static str,
    pub arguments: &'static [PromptArgument],
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    #[error("Prompt template '{0}' not found")]
    NotFound(String),

    #[error("Missing required parameter: '{0}'")]
    MissingParameter(String),

    #[error("Template rendering error: {0}")]
    Render(String),
}

impl PromptError {
    /// HTTP status the error is served with
    pub fn status(&self) -> u16 {
        match self {
            PromptError::NotFound(_) => 404,
            PromptError::MissingParameter(_) | PromptError::Render(_) => 400,
        }
    }
}

const fn required(name: &'static str, description: &'static str) -> PromptArgument {
    PromptArgument {
        name,
        description,
        required: true,
        default: None,
    }
}

pub static PROMPT_TEMPLATES: [PromptTemplate; 5] = [
    PromptTemplate {
        name: "weather_query",
        description: "Ask for the current weather and forecast at a location",
        category: "weather",
        template: "Look up the current weather at {location} and the forecast for the next {days} days. \
Include temperature, humidity, wind speed and chance of precipitation.",
        arguments: &[
            required("location", "Place name or coordinates"),
            PromptArgument {
                name: "days",
                description: "Number of forecast days (defaults to 3)",
                required: false,
                default: Some("3"),
            },
        ],
    },
    PromptTemplate {
        name: "weather_analysis",
        description: "Analyze weather data and give practical advice",
        category: "analysis",
        template: "Analyze the following weather data for {location}:\n\n{data}\n\n\
Please provide:\n1. Trend analysis\n2. Impact on travel\n3. Recommendations",
        arguments: &[
            required("location", "Place name"),
            required("data", "Weather data to analyze"),
        ],
    },
    PromptTemplate {
        name: "weather_report",
        description: "Write a detailed weather report",
        category: "report",
        template: "Write a weather report for {location} covering {period}. The report should include:\n\n\
1. General conditions\n2. Temperature trend\n3. Precipitation summary\n4. Wind speed and direction\n\
5. Notable weather events\n6. Advice for residents",
        arguments: &[
            required("location", "Place name"),
            required("period", "Time span the report covers"),
        ],
    },
    PromptTemplate {
        name: "alert_summary",
        description: "Summarize active weather alerts",
        category: "alert",
        template: "Summarize the weather alerts for {state}:\n\n{alerts}\n\n\
Please include:\n1. Alert types\n2. Affected areas\n3. Expected duration\n4. Safety advice",
        arguments: &[
            required("state", "State or region"),
            required("alerts", "Alert data"),
        ],
    },
    PromptTemplate {
        name: "daily_briefing",
        description: "Write a daily weather briefing",
        category: "daily",
        template: "Write a daily weather briefing for {location}, covering:\n\n\
1. Today's conditions\n2. Temperature range\n3. Chance of precipitation\n4. Wind\n\
5. Air quality\n6. Travel advice\n7. What to wear",
        arguments: &[required("location", "Place name")],
    },
];

pub fn find(name: &str) -> Result<&'static PromptTemplate, PromptError> {
    PROMPT_TEMPLATES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| PromptError::NotFound(name.to_string()))
}

/// Template names grouped by category
pub fn categories() -> BTreeMap<&'static str, Vec<&'static str>> {
    let mut categories: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for template in &PROMPT_TEMPLATES {
        categories
            .entry(template.category)
            .or_default()
            .push(template.name);
    }
    categories
}

impl PromptTemplate {
    /// Fills every `{name}` placeholder in one pass; substituted values are not
    /// re-scanned. Extra parameters are ignored.
    pub fn render(&self, parameters: &Map<String, Value>) -> Result<String, PromptError> {
        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                PromptError::Render(format!("unclosed placeholder in '{}'", self.name))
            })?;
            rendered.push_str(&self.value_for(&after[..close], parameters)?);
            rest = &after[close + 1..];
        }
        rendered.push_str(rest);

        Ok(rendered)
    }

    fn value_for(&self, name: &str, parameters: &Map<String, Value>) -> Result<String, PromptError> {
        match parameters.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => self
                .arguments
                .iter()
                .find(|a| a.name == name)
                .and_then(|a| a.default)
                .map(str::to_string)
                .ok_or_else(|| PromptError::MissingParameter(name.to_string())),
            Some(other) => Ok(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub name: String,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub success: bool,
    pub data: Option<&'static PromptTemplate>,
    pub rendered_template: Option<String>,
    pub error: Option<String>,
}

impl PromptResponse {
    pub fn failure(err: &PromptError) -> Self {
        Self {
            success: false,
            data: None,
            rendered_template: None,
            error: Some(err.to_string()),
        }
    }
}

/// Looks up a template and renders it when any parameters are given
pub fn lookup(request: &PromptRequest) -> Result<PromptResponse, PromptError> {
    let template = find(&request.name)?;
    let rendered_template = match &request.parameters {
        Some(parameters) if !parameters.is_empty() => Some(template.render(parameters)?),
        _ => None,
    };

    Ok(PromptResponse {
        success: true,
        data: Some(template),
        rendered_template,
        error: None,
    })
}
