use std::collections::HashSet;

use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use super::TableError;
use crate::models::IepsProductRate;

/// Catalog of IEPS product categories, in display order.
///
/// Always holds at least one entry; the first entry is the fallback used by
/// lenient lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IepsCatalog {
    products: Vec<IepsProductRate>,
}

impl IepsCatalog {
    /// Builds a catalog from `products`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Empty`] for an empty list,
    /// [`TableError::DuplicateProduct`] when a key repeats and
    /// [`TableError::NegativeRate`] for a rate below zero.
    pub fn new(products: Vec<IepsProductRate>) -> Result<Self, TableError> {
        if products.is_empty() {
            return Err(TableError::Empty);
        }

        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.product_key.as_str()) {
                return Err(TableError::DuplicateProduct(product.product_key.clone()));
            }
            if product.rate_percent.is_sign_negative() {
                return Err(TableError::NegativeRate {
                    product_key: product.product_key.clone(),
                    rate: product.rate_percent,
                });
            }
        }

        Ok(Self { products })
    }

    /// The default excise catalog.
    pub fn mexico_default() -> Self {
        Self {
            products: default_products(),
        }
    }

    /// Exact-key lookup.
    pub fn find(
        &self,
        product_key: &str,
    ) -> Option<&IepsProductRate> {
        self.products.iter().find(|p| p.product_key == product_key)
    }

    /// Entry used when a lenient lookup misses.
    pub fn fallback(&self) -> &IepsProductRate {
        // Non-empty by construction.
        &self.products[0]
    }

    pub fn products(&self) -> &[IepsProductRate] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn default_products() -> Vec<IepsProductRate> {
    vec![
        IepsProductRate::new(
            "alcohol_bajo",
            "Bebidas alcohólicas hasta 14° G.L.",
            dec!(26.5),
            "Bebidas con contenido alcohólico y cerveza con graduación de hasta 14° G.L.",
        ),
        IepsProductRate::new(
            "alcohol_medio",
            "Bebidas alcohólicas de 14° a 20° G.L.",
            dec!(30),
            "Bebidas con contenido alcohólico de más de 14° y hasta 20° G.L.",
        ),
        IepsProductRate::new(
            "alcohol_alto",
            "Bebidas alcohólicas de más de 20° G.L.",
            dec!(53),
            "Bebidas con contenido alcohólico de más de 20° G.L.",
        ),
        IepsProductRate::new(
            "tabacos_labrados",
            "Tabacos labrados",
            dec!(160),
            "Cigarros y otros tabacos labrados.",
        ),
        IepsProductRate::new(
            "puros",
            "Puros hechos a mano",
            dec!(30.4),
            "Puros y otros tabacos labrados hechos enteramente a mano.",
        ),
        IepsProductRate::new(
            "bebidas_energizantes",
            "Bebidas energizantes",
            dec!(25),
            "Bebidas energizantes, concentrados, polvos y jarabes para prepararlas.",
        ),
        IepsProductRate::new(
            "bebidas_azucaradas",
            "Bebidas saborizadas con azúcares añadidos",
            dec!(8),
            "Bebidas saborizadas, concentrados, polvos y jarabes con azúcares añadidos.",
        ),
        IepsProductRate::new(
            "alimentos_alta_densidad",
            "Alimentos de alta densidad calórica",
            dec!(8),
            "Alimentos no básicos con 275 kilocalorías o más por cada 100 gramos.",
        ),
        IepsProductRate::new(
            "plaguicidas",
            "Plaguicidas (categorías 1 y 2)",
            dec!(9),
            "Plaguicidas de toxicidad aguda categorías 1 y 2.",
        ),
        IepsProductRate::new(
            "juegos_apuestas",
            "Juegos con apuestas y sorteos",
            dec!(30),
            "Realización de juegos con apuestas y sorteos.",
        ),
        IepsProductRate::new(
            "telecomunicaciones",
            "Servicios de telecomunicaciones",
            dec!(3),
            "Servicios prestados a través de redes públicas de telecomunicaciones.",
        ),
    ]
}

impl<'de> Deserialize<'de> for IepsCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let products = Vec::<IepsProductRate>::deserialize(deserializer)?;
        Self::new(products).map_err(serde::de::Error::custom)
    }
}
