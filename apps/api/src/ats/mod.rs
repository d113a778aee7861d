//! Résumé ATS engine: keyword extraction, scoring, improvement generation and
//! the apply/patch workflow, plus its HTTP handlers.

pub mod analyzer;
pub mod apply;
pub mod handlers;
pub mod improvements;
pub mod keywords;
pub mod rewrite;
pub mod scorers;
pub mod templates;
pub mod vocabulary;

#[cfg(test)]
pub mod test_support;
