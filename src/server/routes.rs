use super::ScoringState;
use crate::assemble::TraitScores;
use crate::catalog::Trait;
use crate::error::AppError;
use crate::scorer::Scorer;
use crate::validate::Response;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::{debug, warn};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CalculateRequest {
    /// 省略時や `null` は空として扱う
    #[serde(default, deserialize_with = "null_as_empty")]
    pub responses: Vec<Response>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Response>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Response>>::deserialize(deserializer)?.unwrap_or_default())
}

/// フロントエンドの Question 型と同じ形
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: i64,
    pub text: String,
    pub category: Trait,
    pub is_reverse: bool,
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn questions(State(state): State<ScoringState>) -> Json<Vec<QuestionView>> {
    let views = state
        .catalog()
        .questions()
        .iter()
        .map(|question| QuestionView {
            id: question.id,
            text: question.text.clone(),
            category: question.category,
            is_reverse: question.reverse,
        })
        .collect();
    Json(views)
}

/// Content-Type は見ずに本文を JSON として読む
pub(crate) async fn calculate(
    State(state): State<ScoringState>,
    body: Bytes,
) -> Result<Json<TraitScores>, AppError> {
    let request: CalculateRequest = serde_json::from_slice(&body).map_err(|err| {
        warn!(error = %err, "malformed calculate request");
        AppError::MalformedInput(err.to_string())
    })?;

    debug!(
        responses = request.responses.len(),
        aggregation = %state.aggregation(),
        "scoring responses"
    );

    let scorer = Scorer::new(state.catalog(), state.aggregation());
    let scores = scorer.evaluate(&request.responses).map_err(|err| {
        warn!(question_id = err.question_id(), error = %err, "rejected responses");
        AppError::from(err)
    })?;
    Ok(Json(scores))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_responses_are_empty() {
        for body in [r#"{}"#, r#"{"responses":null}"#, r#"{"responses":[]}"#] {
            let request: CalculateRequest = serde_json::from_str(body).unwrap();
            assert!(request.responses.is_empty(), "{body}");
        }
    }

    #[test]
    fn responses_must_be_a_list() {
        assert!(serde_json::from_str::<CalculateRequest>(r#"{"responses":3}"#).is_err());
    }
}
