//! ビッグファイブ性格特性の採点
//!
//! 1〜5のリッカート尺度の回答から、神経症傾向・外向性・誠実性・協調性・開放性の
//! 5特性の得点を求める。

pub mod assemble;
pub mod bulk;
pub mod catalog;
pub mod config;
pub mod error;
pub mod scorer;
pub mod server;
pub mod telemetry;
pub mod validate;

pub use assemble::{assemble, TraitScores};
pub use catalog::{Catalog, CatalogError, Choice, Membership, QuestionInfo, Trait};
pub use error::AppError;
pub use scorer::{invert, normalize, Aggregation, Scorer, NO_RESPONSES};
pub use validate::{validate, Response, ValidationError};
