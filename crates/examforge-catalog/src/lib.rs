pub mod error;
pub mod extract;
pub mod normalize;
pub mod outcomes;
pub mod periods;

pub use error::CatalogError;
pub use extract::{PdfPeriodExtractor, PeriodExtractor};
pub use outcomes::{OutcomeCatalog, OutcomeRow};
pub use periods::{PeriodCatalog, PeriodLookup, PeriodRow};
