use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculations::CalculationError;

/// Reporting period of a taxable amount.
///
/// Serialized with the Spanish names used on payroll receipts (`mensual`,
/// `quincenal`, `semanal`, `anual`); parsing also accepts the English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "mensual", alias = "monthly")]
    Monthly,
    #[serde(rename = "quincenal", alias = "biweekly")]
    Biweekly,
    #[serde(rename = "semanal", alias = "weekly")]
    Weekly,
    #[serde(rename = "anual", alias = "annual")]
    Annual,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Monthly, Period::Biweekly, Period::Weekly, Period::Annual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "mensual",
            Self::Biweekly => "quincenal",
            Self::Weekly => "semanal",
            Self::Annual => "anual",
        }
    }

    pub fn is_monthly(&self) -> bool {
        matches!(self, Self::Monthly)
    }
}

impl fmt::Display for Period {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mensual" | "monthly" => Ok(Self::Monthly),
            "quincenal" | "biweekly" => Ok(Self::Biweekly),
            "semanal" | "weekly" => Ok(Self::Weekly),
            "anual" | "annual" => Ok(Self::Annual),
            _ => Err(CalculationError::InvalidArgument(format!(
                "unknown period '{s}' (expected mensual, quincenal, semanal or anual)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_spanish_and_english_names() {
        assert_eq!("mensual".parse::<Period>(), Ok(Period::Monthly));
        assert_eq!("Quincenal".parse::<Period>(), Ok(Period::Biweekly));
        assert_eq!(" weekly ".parse::<Period>(), Ok(Period::Weekly));
        assert_eq!("annual".parse::<Period>(), Ok(Period::Annual));
    }

    #[test]
    fn rejects_unknown_period() {
        let result = "diario".parse::<Period>();

        assert!(matches!(result, Err(CalculationError::InvalidArgument(_))));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for period in Period::ALL {
            assert_eq!(period.to_string().parse::<Period>(), Ok(period));
        }
    }

    #[test]
    fn serializes_with_spanish_names() {
        let json = serde_json::to_string(&Period::Biweekly).unwrap();
        assert_eq!(json, "\"quincenal\"");

        let parsed: Period = serde_json::from_str("\"annual\"").unwrap();
        assert_eq!(parsed, Period::Annual);
    }
}
