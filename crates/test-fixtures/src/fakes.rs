//! Scripted collaborator fakes.
//!
//! Each fake replays a queue of scripted results, then repeats its fallback.
//! Every call is recorded for assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use syllabus_core::errors::{ExternalServiceError, ServiceKind};
use syllabus_core::models::{
    GenerationRequest, GenerationResponse, RetrievalFeatures, RetrievalQuery, SessionEvent,
};
use syllabus_core::traits::{
    IClock, IEventSink, IGenerationService, IRetrievalService, ISearchFallback,
};

pub struct ScriptedRetrieval {
    script: Mutex<VecDeque<Result<RetrievalFeatures, ExternalServiceError>>>,
    fallback: Result<RetrievalFeatures, ExternalServiceError>,
    queries: Mutex<Vec<RetrievalQuery>>,
}

impl ScriptedRetrieval {
    /// Always returns `features`.
    pub fn constant(features: RetrievalFeatures) -> Self {
        Self::scripted(Vec::new(), Ok(features))
    }

    /// Always fails with `error`.
    pub fn failing(error: ExternalServiceError) -> Self {
        Self::scripted(Vec::new(), Err(error))
    }

    pub fn scripted(
        script: Vec<Result<RetrievalFeatures, ExternalServiceError>>,
        fallback: Result<RetrievalFeatures, ExternalServiceError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<RetrievalQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl IRetrievalService for ScriptedRetrieval {
    fn query(&self, query: &RetrievalQuery) -> Result<RetrievalFeatures, ExternalServiceError> {
        self.queries.lock().unwrap().push(query.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn name(&self) -> &str {
        "scripted-retrieval"
    }
}

pub struct ScriptedGeneration {
    script: Mutex<VecDeque<Result<GenerationResponse, ExternalServiceError>>>,
    fallback: Result<GenerationResponse, ExternalServiceError>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGeneration {
    pub fn constant(text: impl Into<String>) -> Self {
        Self::scripted(
            Vec::new(),
            Ok(GenerationResponse {
                text: text.into(),
                token_usage: 420,
            }),
        )
    }

    pub fn failing(error: ExternalServiceError) -> Self {
        Self::scripted(Vec::new(), Err(error))
    }

    pub fn scripted(
        script: Vec<Result<GenerationResponse, ExternalServiceError>>,
        fallback: Result<GenerationResponse, ExternalServiceError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl IGenerationService for ScriptedGeneration {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ExternalServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Search fallback returning fixed snippets, or a fixed failure.
pub struct StaticSearch {
    result: Result<Vec<String>, ExternalServiceError>,
    calls: Mutex<usize>,
}

impl StaticSearch {
    pub fn snippets(snippets: &[&str]) -> Self {
        Self {
            result: Ok(snippets.iter().map(|s| s.to_string()).collect()),
            calls: Mutex::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            result: Err(ExternalServiceError::transient(
                ServiceKind::SearchFallback,
                "search quota exhausted",
            )),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl ISearchFallback for StaticSearch {
    fn query(&self, _text: &str) -> Result<Vec<String>, ExternalServiceError> {
        *self.calls.lock().unwrap() += 1;
        self.result.clone()
    }
}

/// Event sink that keeps everything it was sent.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind.name())
            .collect()
    }
}

impl IEventSink for RecordingSink {
    fn publish(&self, event: &SessionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 2026-03-02 08:00:00 UTC.
    pub fn fixed() -> Self {
        Self::at(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl IClock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// A well-formed generation in the JSON shape, covering every required element.
pub fn good_generation_text() -> String {
    serde_json::json!({
        "cp": "Peserta didik mampu menyelesaikan sistem persamaan linear dua variabel dan siswa menunjukkan kompetensi memodelkan masalah kontekstual.",
        "atp": "Tujuan pembelajaran: 1. Memodelkan masalah kontekstual dengan persamaan linear. 2. Menyelesaikan sistem persamaan dengan substitusi dan eliminasi. Indikator: siswa menyelesaikan soal cerita."
    })
    .to_string()
}
