//! AI-suggestion oracle boundary.
//!
//! The assistant itself lives outside this crate. The core defines the
//! contract — observation text in, a structured code suggestion or a
//! plain-language explanation out, fallible and slow, awaited off the
//! store's critical path — plus a canned in-process provider so tests and
//! offline demos exercise the same await surface a remote assistant would.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Structured reply to a procedure-code request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureSuggestion {
    /// Suggested CDT code, e.g. "D2740".
    pub procedure_code: String,
    /// One-sentence justification for the code.
    pub justification: String,
}

/// Errors from suggestion operations.
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("Assistant unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed assistant reply: {0}")]
    MalformedReply(#[from] serde_json::Error),
}

/// The assistant contract.
///
/// Implementations may be remote and arbitrarily slow; callers await them
/// and must keep the store unlocked meanwhile. Bad replies surface as
/// `SuggestionError`, never as panics.
pub trait SuggestionProvider: Send + Sync {
    /// Suggest a primary CDT procedure code for a clinical observation.
    fn suggest_procedure(
        &self,
        observation: &str,
    ) -> impl Future<Output = Result<ProcedureSuggestion, SuggestionError>> + Send;

    /// Explain a procedure to a patient in plain, reassuring language.
    fn explain_procedure(
        &self,
        code: &str,
        text: &str,
    ) -> impl Future<Output = Result<String, SuggestionError>> + Send;
}

/// Parse the JSON document an assistant returns for a suggestion request.
pub fn parse_suggestion_reply(reply: &str) -> Result<ProcedureSuggestion, SuggestionError> {
    Ok(serde_json::from_str(reply)?)
}

// ─── Canned provider ─────────────────────────────────────────────────────────

/// Deterministic in-process assistant.
///
/// Keyword lookup over a small canned table, with an optional artificial
/// latency so hosts exercise the await path realistically.
#[derive(Debug, Default)]
pub struct CannedProvider {
    latency: Duration,
}

impl CannedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    fn lookup(observation: &str) -> ProcedureSuggestion {
        let text = observation.to_lowercase();
        let (code, justification) = if text.contains("crown") || text.contains("fracture") {
            (
                "D2740",
                "A fractured or heavily restored tooth is best protected by a full-coverage ceramic crown.",
            )
        } else if text.contains("plaque") || text.contains("calculus") || text.contains("cleaning")
        {
            (
                "D1110",
                "Generalized plaque and calculus call for an adult prophylaxis.",
            )
        } else if text.contains("pain") || text.contains("ache") {
            (
                "D0140",
                "Localized pain warrants a limited, problem-focused evaluation before treatment.",
            )
        } else {
            (
                "D0120",
                "With no acute findings, a periodic oral evaluation is the appropriate next step.",
            )
        };
        ProcedureSuggestion {
            procedure_code: code.into(),
            justification: justification.into(),
        }
    }
}

impl SuggestionProvider for CannedProvider {
    fn suggest_procedure(
        &self,
        observation: &str,
    ) -> impl Future<Output = Result<ProcedureSuggestion, SuggestionError>> + Send {
        async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            Ok(Self::lookup(observation))
        }
    }

    fn explain_procedure(
        &self,
        code: &str,
        text: &str,
    ) -> impl Future<Output = Result<String, SuggestionError>> + Send {
        async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            Ok(format!(
                "{text} ({code}) is a routine dental procedure. Your dentist will walk you \
                 through each step, and most patients are comfortable throughout."
            ))
        }
    }
}

/// An assistant that is configured out.
///
/// Stands in when no backend is reachable; every call reports
/// `Unavailable`, which the UI renders as its fallback copy.
#[derive(Debug, Default)]
pub struct OfflineProvider;

impl SuggestionProvider for OfflineProvider {
    fn suggest_procedure(
        &self,
        _observation: &str,
    ) -> impl Future<Output = Result<ProcedureSuggestion, SuggestionError>> + Send {
        async {
            Err(SuggestionError::Unavailable(
                "assistant client is not configured".into(),
            ))
        }
    }

    fn explain_procedure(
        &self,
        _code: &str,
        _text: &str,
    ) -> impl Future<Output = Result<String, SuggestionError>> + Send {
        async {
            Err(SuggestionError::Unavailable(
                "assistant client is not configured".into(),
            ))
        }
    }
}
