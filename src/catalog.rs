use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../resources/questions.json");

/// ビッグファイブの5特性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trait {
    Neuroticism,
    Extraversion,
    Conscientiousness,
    Agreeableness,
    Openness,
}

impl Trait {
    /// 結果を組み立てる順序
    pub const ALL: [Trait; 5] = [
        Trait::Neuroticism,
        Trait::Extraversion,
        Trait::Conscientiousness,
        Trait::Agreeableness,
        Trait::Openness,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Trait::Neuroticism => "neuroticism",
            Trait::Extraversion => "extraversion",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Agreeableness => "agreeableness",
            Trait::Openness => "openness",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trait::Neuroticism => "神経症傾向",
            Trait::Extraversion => "外向性",
            Trait::Conscientiousness => "誠実性",
            Trait::Agreeableness => "協調性",
            Trait::Openness => "開放性",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 回答選択肢
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub score: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionInfo {
    pub id: i64,
    #[serde(default)]
    pub text: String,
    pub category: Trait,
    #[serde(default)]
    pub reverse: bool,
    /// 加重平均方式でのみ使う係数。未指定なら1.0扱い。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl QuestionInfo {
    pub fn new(id: i64, category: Trait, reverse: bool) -> Self {
        Self {
            id,
            text: String::new(),
            category,
            reverse,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// 検証でどの設問番号を受け付けるか
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    /// `1..=max_valid_id` の範囲内なら、どの特性にも属さない番号も受け付ける
    #[default]
    Range,
    /// いずれかの特性に属する番号のみ
    Exact,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read question catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed question catalog: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("question {id} is assigned more than once")]
    DuplicateQuestion { id: i64 },
    #[error("question {id} is outside the valid range 1..={max}")]
    OutOfRange { id: i64, max: i64 },
    #[error("question {id} must have a positive finite weight")]
    InvalidWeight { id: i64 },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    max_valid_id: Option<i64>,
    #[serde(default)]
    membership: Membership,
    #[serde(default)]
    scores: Vec<Choice>,
    questions: Vec<QuestionInfo>,
}

/// 設問マスタ
///
/// 構築時に検証済みで、以降は変更されない。リクエスト間で `Arc` 越しに共有する。
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<QuestionInfo>,
    buckets: [Vec<QuestionInfo>; 5],
    index: HashMap<i64, usize>,
    choices: Vec<Choice>,
    max_valid_id: i64,
    membership: Membership,
}

impl Catalog {
    pub fn new(
        questions: Vec<QuestionInfo>,
        max_valid_id: i64,
        membership: Membership,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(questions.len());
        let mut buckets: [Vec<QuestionInfo>; 5] = Default::default();

        for (position, question) in questions.iter().enumerate() {
            if !(1..=max_valid_id).contains(&question.id) {
                return Err(CatalogError::OutOfRange {
                    id: question.id,
                    max: max_valid_id,
                });
            }
            if let Some(weight) = question.weight {
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(CatalogError::InvalidWeight { id: question.id });
                }
            }
            if index.insert(question.id, position).is_some() {
                return Err(CatalogError::DuplicateQuestion { id: question.id });
            }
            buckets[question.category.index()].push(question.clone());
        }

        Ok(Self {
            questions,
            buckets,
            index,
            choices: Vec::new(),
            max_valid_id,
            membership,
        })
    }

    /// 同梱の40設問マスタ
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::from_file(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Self::from_file(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let f = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let max_valid_id = file
            .max_valid_id
            .unwrap_or_else(|| file.questions.iter().map(|q| q.id).max().unwrap_or(0));
        let mut catalog = Self::new(file.questions, max_valid_id, file.membership)?;
        catalog.choices = file.scores;
        Ok(catalog)
    }

    /// 特性に属する設問を定義順で返す
    pub fn lookup(&self, category: Trait) -> &[QuestionInfo] {
        &self.buckets[category.index()]
    }

    /// 設問番号を指定して設問を取得する
    pub fn question(&self, id: i64) -> Option<&QuestionInfo> {
        self.index.get(&id).map(|&position| &self.questions[position])
    }

    /// 全設問を定義順で取得する
    pub fn questions(&self) -> &[QuestionInfo] {
        &self.questions
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn is_known_question(&self, id: i64) -> bool {
        match self.membership {
            Membership::Range => (1..=self.max_valid_id).contains(&id),
            Membership::Exact => self.index.contains_key(&id),
        }
    }

    pub fn max_valid_id(&self) -> i64 {
        self.max_valid_id
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }
}
