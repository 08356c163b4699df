mod clock;
mod event_sink;
mod generation;
mod retrieval;
mod search_fallback;

pub use clock::{IClock, SystemClock};
pub use event_sink::IEventSink;
pub use generation::IGenerationService;
pub use retrieval::IRetrievalService;
pub use search_fallback::ISearchFallback;
