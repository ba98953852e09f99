use std::collections::HashMap;

use tracing::debug;

use super::{TableError, TaxTables};

/// Tax tables keyed by tax year.
///
/// Typical lifetime:
/// 1. Create with [`TableRegistry::new`] or [`TableRegistry::with_defaults`].
/// 2. Call [`register`](Self::register) once per loaded year.
/// 3. Hand `&TaxTables` from [`get`](Self::get) to the calculators.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: HashMap<i32, TaxTables>,
}

impl TableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the embedded 2024 schedules.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TaxTables::mexico_2024().clone());
        registry
    }

    /// Register tables for their tax year.
    ///
    /// Tables already registered for the same year are silently replaced.
    pub fn register(
        &mut self,
        tables: TaxTables,
    ) {
        debug!(tax_year = tables.tax_year, "registering tax tables");
        self.tables.insert(tables.tax_year, tables);
    }

    /// Registered tax years, ascending.
    pub fn available_years(&self) -> Vec<i32> {
        let mut years: Vec<_> = self.tables.keys().copied().collect();
        years.sort_unstable();
        years
    }

    /// Most recent registered year, if any.
    pub fn latest_year(&self) -> Option<i32> {
        self.tables.keys().copied().max()
    }

    /// # Errors
    ///
    /// [`TableError::UnknownYear`] when nothing is registered for `year`.
    pub fn get(
        &self,
        year: i32,
    ) -> Result<&TaxTables, TableError> {
        self.tables.get(&year).ok_or_else(|| TableError::UnknownYear {
            year,
            available: self.available_years(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tables_for(year: i32) -> TaxTables {
        TaxTables {
            tax_year: year,
            ..TaxTables::mexico_2024().clone()
        }
    }

    #[test]
    fn with_defaults_registers_2024() {
        let registry = TableRegistry::with_defaults();

        assert_eq!(registry.available_years(), vec![2024]);
        assert_eq!(registry.get(2024).map(|t| t.tax_year), Ok(2024));
    }

    #[test]
    fn get_unknown_year_lists_available_years() {
        let mut registry = TableRegistry::new();
        registry.register(tables_for(2025));
        registry.register(tables_for(2023));

        let result = registry.get(2019);

        assert_eq!(
            result,
            Err(TableError::UnknownYear {
                year: 2019,
                available: vec![2023, 2025],
            })
        );
    }

    #[test]
    fn register_replaces_same_year() {
        let mut registry = TableRegistry::with_defaults();
        let mut replacement = tables_for(2024);
        replacement.subsidies = TaxTables::mexico_2024().subsidies.clone();
        registry.register(replacement.clone());

        assert_eq!(registry.available_years(), vec![2024]);
        assert_eq!(registry.get(2024), Ok(&replacement));
    }

    #[test]
    fn latest_year_is_highest_registered() {
        let mut registry = TableRegistry::new();
        assert_eq!(registry.latest_year(), None);

        registry.register(tables_for(2023));
        registry.register(tables_for(2025));

        assert_eq!(registry.latest_year(), Some(2025));
    }
}
