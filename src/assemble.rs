use crate::catalog::Trait;
use crate::scorer::{Scorer, NO_RESPONSES};
use crate::validate::Response;
use serde::{Deserialize, Serialize};

/// 5特性の得点
///
/// 各値は 1.0〜5.0、該当回答がなければ 0.0。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitScores {
    pub neuroticism: f64,
    pub extraversion: f64,
    pub conscientiousness: f64,
    pub agreeableness: f64,
    pub openness: f64,
}

impl TraitScores {
    pub fn get(&self, category: Trait) -> f64 {
        match category {
            Trait::Neuroticism => self.neuroticism,
            Trait::Extraversion => self.extraversion,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Agreeableness => self.agreeableness,
            Trait::Openness => self.openness,
        }
    }

    fn set(&mut self, category: Trait, value: f64) {
        let slot = match category {
            Trait::Neuroticism => &mut self.neuroticism,
            Trait::Extraversion => &mut self.extraversion,
            Trait::Conscientiousness => &mut self.conscientiousness,
            Trait::Agreeableness => &mut self.agreeableness,
            Trait::Openness => &mut self.openness,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        Trait::ALL.into_iter().map(|category| (category, self.get(category)))
    }

    /// 該当回答があった特性かどうか
    pub fn has_data(&self, category: Trait) -> bool {
        self.get(category) != NO_RESPONSES
    }
}

/// 特性ごとに Scorer を1回ずつ、固定順で呼ぶ
pub fn assemble(scorer: &Scorer<'_>, responses: &[Response]) -> TraitScores {
    let mut scores = TraitScores::default();
    for category in Trait::ALL {
        scores.set(category, scorer.score(category, responses));
    }
    scores
}
