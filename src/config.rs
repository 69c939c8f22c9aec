use crate::error::SheetsError;
use crate::models::ClassLevel;

/// Spreadsheet API configuration, read from the environment once at startup
/// and passed into the client by reference. Nothing in the core reads env
/// vars after this point.
#[derive(Debug, Clone, Default)]
pub struct SheetsConfig {
    pub api_key: Option<String>,
    pub plus_one_sheet_id: Option<String>,
    pub plus_two_sheet_id: Option<String>,
    pub plus_one_range: Option<String>,
    pub plus_two_range: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigStatus {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl SheetsConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_nonempty("GOOGLE_SHEETS_API_KEY"),
            plus_one_sheet_id: env_nonempty("GOOGLE_SHEET_PLUS_ONE_ID"),
            plus_two_sheet_id: env_nonempty("GOOGLE_SHEET_PLUS_TWO_ID"),
            plus_one_range: env_nonempty("GOOGLE_SHEET_PLUS_ONE_RANGE"),
            plus_two_range: env_nonempty("GOOGLE_SHEET_PLUS_TWO_RANGE"),
        }
    }

    pub fn sheet_id(&self, class: ClassLevel) -> Option<&str> {
        match class {
            ClassLevel::PlusOne => self.plus_one_sheet_id.as_deref(),
            ClassLevel::PlusTwo => self.plus_two_sheet_id.as_deref(),
        }
    }

    pub fn range_override(&self, class: ClassLevel) -> Option<&str> {
        match class {
            ClassLevel::PlusOne => self.plus_one_range.as_deref(),
            ClassLevel::PlusTwo => self.plus_two_range.as_deref(),
        }
    }

    /// Every missing required variable, not just the first.
    pub fn validate(&self) -> ConfigStatus {
        let mut errors = Vec::new();

        if self.api_key.is_none() {
            errors.push("GOOGLE_SHEETS_API_KEY is not set".to_string());
        }
        if self.plus_one_sheet_id.is_none() {
            errors.push("GOOGLE_SHEET_PLUS_ONE_ID is not set".to_string());
        }
        if self.plus_two_sheet_id.is_none() {
            errors.push("GOOGLE_SHEET_PLUS_TWO_ID is not set".to_string());
        }

        ConfigStatus {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Credential and sheet id needed to fetch one class, or a configuration
    /// error listing everything that is missing. Checked before any I/O.
    pub fn require(&self, class: ClassLevel) -> Result<(&str, &str), SheetsError> {
        let mut missing = Vec::new();

        if self.api_key.is_none() {
            missing.push("GOOGLE_SHEETS_API_KEY".to_string());
        }
        if self.sheet_id(class).is_none() {
            missing.push(match class {
                ClassLevel::PlusOne => "GOOGLE_SHEET_PLUS_ONE_ID".to_string(),
                ClassLevel::PlusTwo => "GOOGLE_SHEET_PLUS_TWO_ID".to_string(),
            });
        }

        if !missing.is_empty() {
            return Err(SheetsError::Config { missing });
        }

        // Both unwraps guarded above.
        Ok((
            self.api_key.as_deref().unwrap_or_default(),
            self.sheet_id(class).unwrap_or_default(),
        ))
    }

    /// Human-readable status with secrets masked, for `check-config`.
    pub fn describe(&self) -> String {
        format!(
            "api key: {}\nplus-one sheet: {}\nplus-two sheet: {}",
            mask(self.api_key.as_deref()),
            mask(self.plus_one_sheet_id.as_deref()),
            mask(self.plus_two_sheet_id.as_deref()),
        )
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn mask(value: Option<&str>) -> String {
    match value {
        Some(value) => {
            let prefix: String = value.chars().take(8).collect();
            format!("{prefix}...")
        }
        None => "not set".to_string(),
    }
}
