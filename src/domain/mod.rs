mod assignment;
mod city;
mod contract;
mod employee;
mod holder;
mod ids;
mod installments;
mod invoice;
mod money;
mod note;
mod payment;
mod plan;

pub use assignment::*;
pub use city::*;
pub use contract::*;
pub use employee::*;
pub use holder::*;
pub use ids::*;
pub use installments::*;
pub use invoice::*;
pub use money::*;
pub use note::*;
pub use payment::*;
pub use plan::*;
