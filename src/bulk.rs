//! 複数回答者の一括採点
//!
//! 入力は1行1回答の縦持ちCSV（`respondent,questionId,score`）。
//! 回答者ごとに初出順でまとめ、結果は1行1回答者のCSVで書き出す。

use crate::assemble::TraitScores;
use crate::scorer::Scorer;
use crate::validate::{Response, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

#[derive(Debug, thiserror::Error)]
pub enum BulkError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct BulkRow {
    respondent: String,
    #[serde(rename = "questionId")]
    question_id: i64,
    score: i64,
}

#[derive(Debug, Serialize)]
struct BulkRecord<'a> {
    respondent: &'a str,
    neuroticism: f64,
    extraversion: f64,
    conscientiousness: f64,
    agreeableness: f64,
    openness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Respondent {
    pub id: String,
    pub responses: Vec<Response>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    pub respondent: String,
    pub result: Result<TraitScores, ValidationError>,
}

pub fn read_bulk<R: Read>(reader: R) -> Result<Vec<Respondent>, BulkError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut respondents: Vec<Respondent> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in reader.deserialize::<BulkRow>() {
        let row = row?;
        let response = Response::new(row.question_id, row.score);
        match positions.get(&row.respondent) {
            Some(&position) => respondents[position].responses.push(response),
            None => {
                positions.insert(row.respondent.clone(), respondents.len());
                respondents.push(Respondent {
                    id: row.respondent,
                    responses: vec![response],
                });
            }
        }
    }
    Ok(respondents)
}

pub fn score_all(scorer: &Scorer<'_>, respondents: &[Respondent]) -> Vec<BulkOutcome> {
    respondents
        .iter()
        .map(|respondent| BulkOutcome {
            respondent: respondent.id.clone(),
            result: scorer.evaluate(&respondent.responses),
        })
        .collect()
}

/// 採点できた回答者だけを書き出し、その件数を返す
pub fn write_scores<W: Write>(writer: W, outcomes: &[BulkOutcome]) -> Result<usize, BulkError> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut written = 0;
    for outcome in outcomes {
        if let Ok(scores) = &outcome.result {
            writer.serialize(BulkRecord {
                respondent: &outcome.respondent,
                neuroticism: scores.neuroticism,
                extraversion: scores.extraversion,
                conscientiousness: scores.conscientiousness,
                agreeableness: scores.agreeableness,
                openness: scores.openness,
            })?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}
