//! Per-family service front-ends built on the shared core: configuration
//! resolution, token handling, header rules and the poll loop are all
//! funneled through [`ServiceCore`]; each family adds only its endpoints
//! and payload shapes.

pub mod agents;
pub mod content;
pub mod core;
pub mod curation;
pub mod discovery;
pub mod enrichment;
pub mod ingestion;

pub use agents::AgentsService;
pub use content::{ContentToProcess, CUSTOM_ID_PREFIX};
pub use core::ServiceCore;
pub use curation::DataCurationService;
pub use discovery::DiscoveryService;
pub use enrichment::{EnrichmentRequest, EnrichmentService};
pub use ingestion::IngestionService;
