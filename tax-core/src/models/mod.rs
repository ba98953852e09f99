mod calculation_step;
mod ieps_product;
mod period;
mod tax_bracket;
mod tax_result;

pub(crate) use calculation_step::StepLedger;
pub use calculation_step::CalculationStep;
pub use ieps_product::IepsProductRate;
pub use period::Period;
pub use tax_bracket::{Band, SubsidyBand, TaxBracket};
pub use tax_result::{BreakdownLine, IepsResult, IsrResult, IvaResult};
