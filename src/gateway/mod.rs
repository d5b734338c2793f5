//! Knowledge Gateway - argument validation, remote calls, normalization, error containment

mod envelope;
mod handlers;
mod normalize;

pub use envelope::{
    INGEST_FAILED_MESSAGE, INGEST_OK_MESSAGE, IngestResponse, SEARCH_FAILED_MESSAGE, SEARCH_OK_MESSAGE,
    SearchResponse,
};
pub use handlers::{KnowledgeGateway, SEARCH_RESULT_LIMIT};
pub use normalize::{
    DEFAULT_ACK, DISPLAY_LIMIT, ELLIPSIS, Entity, Fact, SearchSummary, UNKNOWN_ENTITY_NAME, normalize_results,
    render_ack, render_timestamp, truncate_for_display,
};
