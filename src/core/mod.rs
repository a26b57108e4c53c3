pub mod enricher;
pub mod etl;
pub mod pipeline;
pub mod publisher;
pub mod ranker;
pub mod writer;

pub use crate::domain::model::{PublishResponse, RankedReference, Record, RunSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
