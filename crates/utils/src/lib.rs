pub mod alias_store;
pub mod amounts;
pub mod dates;
pub mod installments;

// Re-export commonly used items
pub use crate::alias_store::{AliasFields, AliasStore};
pub use crate::amounts::parse_amount;
pub use crate::dates::{day_start_utc, parse_br_date, parse_ofx_datetime};
pub use crate::installments::{
    installment_suffix, resolve_alias_with_suffix, strip_installment_suffix,
};
