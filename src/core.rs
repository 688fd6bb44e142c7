//! Contracted demand optimization, free of any I/O.

pub mod blue;
pub mod comparison;
pub mod green;
pub mod history;
pub mod optimizer;
pub mod overrun;
pub mod search;
pub mod series;
pub mod tariffs;

pub use self::{
    comparison::{Comparison, Modality},
    optimizer::{Optimizer, Outcome, Rejection},
    series::Series,
    tariffs::Tariffs,
};
