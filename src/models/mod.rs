use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod listing;
pub mod search_query;
pub mod valuation;

// Re-exports for convenience
pub use listing::*;
pub use search_query::*;
pub use valuation::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    /// Order used by the interactive menu and the web form.
    pub const ALL: [FuelType; 4] = [
        FuelType::Gasoline,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
    ];

    /// Value of the `fuel` query parameter on the listings site.
    pub fn site_code(self) -> &'static str {
        match self {
            FuelType::Gasoline => "1",
            FuelType::Diesel => "2",
            FuelType::Electric => "3",
            FuelType::Hybrid => "9999",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FuelType::Gasoline => "Gasoline",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
            FuelType::Hybrid => "hybrid",
        }
    }

    /// Maps a 1-based menu choice ("1".."4") to a fuel type.
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(FuelType::Gasoline),
            "2" => Some(FuelType::Diesel),
            "3" => Some(FuelType::Electric),
            "4" => Some(FuelType::Hybrid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GearboxType {
    Automatic,
    Manual,
}

impl GearboxType {
    pub const ALL: [GearboxType; 2] = [GearboxType::Automatic, GearboxType::Manual];

    /// Value of the `trans` query parameter on the listings site.
    pub fn site_code(self) -> &'static str {
        match self {
            GearboxType::Automatic => "1000",
            GearboxType::Manual => "5",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GearboxType::Automatic => "Automatic",
            GearboxType::Manual => "Manual",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GearboxType::Automatic => "automatic",
            GearboxType::Manual => "manual",
        }
    }

    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(GearboxType::Automatic),
            "2" => Some(GearboxType::Manual),
            _ => None,
        }
    }
}
