use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{FuelType, GearboxType};
use crate::Result;

pub const MIN_YEAR: i32 = 1920;
pub const MAX_YEAR: i32 = 2025;

/// Everything needed to build one listings request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_year_order"))]
pub struct SearchQuery {
    #[validate(length(min = 1, message = "make is required"))]
    pub make: String,
    #[validate(length(min = 1, message = "model is required"))]
    pub model: String,
    #[validate(range(min = 1920, max = 2025, message = "start year must be between 1920 and 2025"))]
    pub start_year: i32,
    #[validate(range(min = 1920, max = 2025, message = "end year must be between 1920 and 2025"))]
    pub end_year: i32,
    pub fuel: FuelType,
    pub gearbox: GearboxType,
}

fn validate_year_order(query: &SearchQuery) -> std::result::Result<(), ValidationError> {
    if query.end_year < query.start_year {
        let mut err = ValidationError::new("year_order");
        err.message = Some("end year must not be before start year".into());
        return Err(err);
    }
    Ok(())
}

impl SearchQuery {
    /// Trims make and model and validates the whole query.
    pub fn new(
        make: &str,
        model: &str,
        start_year: i32,
        end_year: i32,
        fuel: FuelType,
        gearbox: GearboxType,
    ) -> Result<Self> {
        let query = SearchQuery {
            make: make.trim().to_string(),
            model: model.trim().to_string(),
            start_year,
            end_year,
            fuel,
            gearbox,
        };
        query.validate()?;
        Ok(query)
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}
