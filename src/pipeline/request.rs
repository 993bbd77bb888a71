use std::sync::OnceLock;

use regex::Regex;

use crate::lib::errors::LaunchError;

/// Fixed shape check for business dates; the calendar itself is not validated.
const BUSINESS_DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const BUSINESS_DATE_FORMAT: &str = "%Y-%m-%d";

fn business_date_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(BUSINESS_DATE_PATTERN).expect("business date pattern is valid"))
}

/// Whether `value` has the `YYYY-MM-DD` shape.
pub fn is_business_date(value: &str) -> bool {
    business_date_regex().is_match(value)
}

/// Local current date in business date format.
pub fn today() -> String {
    chrono::Local::now().format(BUSINESS_DATE_FORMAT).to_string()
}

/// Validated pipeline parameters, forwarded verbatim as named flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    pub country: String,
    pub le_book: String,
    pub pipeline_type: String,
    pub business_date: String,
    /// True when the date was injected rather than supplied.
    pub date_defaulted: bool,
}

impl PipelineRequest {
    pub fn from_parts(
        country: String,
        le_book: String,
        pipeline_type: String,
        business_date: Option<String>,
        today: &str,
    ) -> Result<Self, LaunchError> {
        require_non_empty("country", &country)?;
        require_non_empty("le_book", &le_book)?;
        require_non_empty("pipeline_type", &pipeline_type)?;

        let (business_date, date_defaulted) = match business_date {
            Some(date) => (date, false),
            None => (today.to_string(), true),
        };
        if !is_business_date(&business_date) {
            return Err(LaunchError::InvalidBusinessDate {
                value: business_date,
            });
        }

        Ok(Self {
            country,
            le_book,
            pipeline_type,
            business_date,
            date_defaulted,
        })
    }

    /// Reject pipeline types outside `allowed`; an empty list accepts anything.
    pub fn check_pipeline_type(&self, allowed: &[String]) -> Result<(), LaunchError> {
        if allowed.is_empty() || allowed.iter().any(|name| name == &self.pipeline_type) {
            return Ok(());
        }
        Err(LaunchError::PipelineTypeNotAllowed {
            value: self.pipeline_type.clone(),
            allowed: allowed.join(", "),
        })
    }

    /// Named flags in the order the pipeline entry point documents them.
    pub fn flags(&self) -> [(&'static str, &str); 4] {
        [
            ("--country", self.country.as_str()),
            ("--le_book", self.le_book.as_str()),
            ("--pipeline_type", self.pipeline_type.as_str()),
            ("--business_date", self.business_date.as_str()),
        ]
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), LaunchError> {
    if value.trim().is_empty() {
        return Err(LaunchError::EmptyField { field });
    }
    Ok(())
}
