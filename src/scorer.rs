use crate::assemble::{assemble, TraitScores};
use crate::catalog::{Catalog, QuestionInfo, Trait};
use crate::validate::{validate, Response, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 逆転項目の反転基準。1〜5の尺度なので 6 - score。
pub const REVERSE_PIVOT: i64 = 6;

/// 該当する回答が1件もない特性の値。1〜5の得点とは区別する。
pub const NO_RESPONSES: f64 = 0.0;

pub const TRAIT_MIN: f64 = 1.0;
pub const TRAIT_MAX: f64 = 5.0;

/// 特性ごとの集計方式
///
/// 同じ回答でも方式によって得点が変わるため、プロセス起動時にどちらか一方を選ぶ。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// 単純平均
    #[default]
    Mean,
    /// 設問ごとの係数による加重平均
    Weighted,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown aggregation '{0}': expected 'mean' or 'weighted'")]
pub struct UnknownAggregation(pub String);

impl FromStr for Aggregation {
    type Err = UnknownAggregation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mean" | "unweighted" => Ok(Aggregation::Mean),
            "weighted" => Ok(Aggregation::Weighted),
            _ => Err(UnknownAggregation(value.to_string())),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Mean => f.write_str("mean"),
            Aggregation::Weighted => f.write_str("weighted"),
        }
    }
}

pub fn invert(score: i64) -> i64 {
    REVERSE_PIVOT - score
}

/// 逆転項目であれば得点を反転する
pub fn effective_score(question: &QuestionInfo, score: i64) -> i64 {
    if question.reverse {
        invert(score)
    } else {
        score
    }
}

/// 1〜5の範囲に収める
pub fn normalize(score: f64) -> f64 {
    score.min(TRAIT_MAX).max(TRAIT_MIN)
}

#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    catalog: &'a Catalog,
    aggregation: Aggregation,
}

impl<'a> Scorer<'a> {
    pub fn new(catalog: &'a Catalog, aggregation: Aggregation) -> Self {
        Self {
            catalog,
            aggregation,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// 検証してから5特性を組み立てる。違反があれば部分的な結果は返さない。
    pub fn evaluate(&self, responses: &[Response]) -> Result<TraitScores, ValidationError> {
        validate(self.catalog, responses)?;
        Ok(assemble(self, responses))
    }

    /// 回答全体から1特性の得点を求める
    ///
    /// `category` に属する回答はすべて集計に入るため、同じ設問への重複回答は
    /// 集計方式によらず重複して数える。該当がなければ範囲に収めずに
    /// [`NO_RESPONSES`] を返す。
    pub fn score(&self, category: Trait, responses: &[Response]) -> f64 {
        let mut total = 0.0;
        let mut weight_sum = 0.0;

        for (question, response) in self.contributions(category, responses) {
            let weight = self.weight_of(question);
            total += effective_score(question, response.score) as f64 * weight;
            weight_sum += weight;
        }

        if weight_sum == 0.0 {
            return NO_RESPONSES;
        }
        normalize(total / weight_sum)
    }

    fn contributions<'r>(
        &'r self,
        category: Trait,
        responses: &'r [Response],
    ) -> impl Iterator<Item = (&'a QuestionInfo, &'r Response)> + 'r {
        let catalog = self.catalog;
        responses.iter().filter_map(move |response| {
            catalog
                .question(response.question_id)
                .filter(|question| question.category == category)
                .map(|question| (question, response))
        })
    }

    fn weight_of(&self, question: &QuestionInfo) -> f64 {
        match self.aggregation {
            Aggregation::Mean => 1.0,
            Aggregation::Weighted => question.weight.unwrap_or(1.0),
        }
    }
}
