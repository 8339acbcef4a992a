pub mod config;
pub mod decision;
pub mod error;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod signal;

pub use decision::*;
pub use error::*;
pub use metrics::*;
pub use pipeline::*;
pub use signal::*;
