use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

/// 1設問への回答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: i64,
    pub score: i64,
}

impl Response {
    pub fn new(question_id: i64, score: i64) -> Self {
        Self { question_id, score }
    }
}

impl From<(i64, i64)> for Response {
    fn from((question_id, score): (i64, i64)) -> Self {
        Self::new(question_id, score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// 回答選択肢が違反
    #[error("invalid score for question {question_id}: score must be between 1 and 5")]
    InvalidScore { question_id: i64 },
    /// 設問マスタにない設問番号
    #[error("invalid question ID: {question_id}")]
    UnknownQuestion { question_id: i64 },
}

impl ValidationError {
    pub fn question_id(&self) -> i64 {
        match self {
            ValidationError::InvalidScore { question_id }
            | ValidationError::UnknownQuestion { question_id } => *question_id,
        }
    }
}

/// 回答を先頭から検査し、最初の違反で打ち切る。
///
/// 得点の範囲を設問番号より先に検査するため、両方に違反する回答は `InvalidScore` になる。
/// 回答が空でもエラーにはしない。
pub fn validate(catalog: &Catalog, responses: &[Response]) -> Result<(), ValidationError> {
    for response in responses {
        if !(MIN_SCORE..=MAX_SCORE).contains(&response.score) {
            return Err(ValidationError::InvalidScore {
                question_id: response.question_id,
            });
        }
        if !catalog.is_known_question(response.question_id) {
            return Err(ValidationError::UnknownQuestion {
                question_id: response.question_id,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::{Membership, QuestionInfo, Trait};
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_empty_is_valid() {
        assert_eq!(validate(&catalog(), &[]), Ok(()));
    }

    #[test]
    fn test_score_bounds() {
        let catalog = catalog();
        assert!(validate(&catalog, &[Response::new(1, 1)]).is_ok());
        assert!(validate(&catalog, &[Response::new(1, 5)]).is_ok());
        assert_eq!(
            validate(&catalog, &[Response::new(1, 6)]),
            Err(ValidationError::InvalidScore { question_id: 1 })
        );
        assert_eq!(
            validate(&catalog, &[Response::new(1, 0)]),
            Err(ValidationError::InvalidScore { question_id: 1 })
        );
    }

    #[test]
    fn test_unknown_question() {
        let catalog = catalog();
        assert_eq!(
            validate(&catalog, &[Response::new(999, 3)]),
            Err(ValidationError::UnknownQuestion { question_id: 999 })
        );
        assert_eq!(
            validate(&catalog, &[Response::new(0, 3)]),
            Err(ValidationError::UnknownQuestion { question_id: 0 })
        );
    }

    #[test]
    fn test_exact_membership_rejects_unused_ids() {
        let catalog = Catalog::new(
            vec![
                QuestionInfo::new(1, Trait::Neuroticism, false),
                QuestionInfo::new(22, Trait::Agreeableness, false),
            ],
            51,
            Membership::Exact,
        )
        .unwrap();
        assert_eq!(validate(&catalog, &[Response::new(1, 3)]), Ok(()));
        assert_eq!(
            validate(&catalog, &[Response::new(21, 3)]),
            Err(ValidationError::UnknownQuestion { question_id: 21 })
        );
        // 範囲方式の同梱マスタでは21番も受け付ける
        assert_eq!(validate(&Catalog::builtin().unwrap(), &[Response::new(21, 3)]), Ok(()));
    }

    #[test]
    fn test_first_failure_wins() {
        let responses = [
            Response::new(2, 3),
            Response::new(52, 3),
            Response::new(3, 9),
        ];
        assert_eq!(
            validate(&catalog(), &responses),
            Err(ValidationError::UnknownQuestion { question_id: 52 })
        );
    }

    #[test]
    fn test_score_checked_before_question() {
        assert_eq!(
            validate(&catalog(), &[Response::new(999, 0)]),
            Err(ValidationError::InvalidScore { question_id: 999 })
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::InvalidScore { question_id: 1 }.to_string(),
            "invalid score for question 1: score must be between 1 and 5"
        );
        assert_eq!(
            ValidationError::UnknownQuestion { question_id: 999 }.to_string(),
            "invalid question ID: 999"
        );
    }

    #[test]
    fn test_response_wire_format() {
        let response: Response = serde_json::from_str(r#"{"questionId":29,"score":2}"#).unwrap();
        assert_eq!(response, Response::new(29, 2));
    }

    proptest! {
        #[test]
        fn in_range_scores_pass(id in 1i64..=51, score in 1i64..=5) {
            prop_assert!(validate(&catalog(), &[Response::new(id, score)]).is_ok());
        }

        #[test]
        fn out_of_range_scores_name_the_question(
            id in 1i64..=51,
            score in prop_oneof![i64::MIN..1i64, 6i64..i64::MAX],
        ) {
            let err = validate(&catalog(), &[Response::new(id, score)]).unwrap_err();
            prop_assert_eq!(err, ValidationError::InvalidScore { question_id: id });
        }

        #[test]
        fn unknown_ids_name_the_question(
            id in prop_oneof![i64::MIN..1i64, 52i64..i64::MAX],
            score in 1i64..=5,
        ) {
            let err = validate(&catalog(), &[Response::new(id, score)]).unwrap_err();
            prop_assert_eq!(err.question_id(), id);
            prop_assert!(err.to_string().contains(&id.to_string()));
        }
    }
}
