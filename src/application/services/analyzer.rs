use std::sync::Arc;

use crate::domain::models::Morpheme;

/// Morphological analyzer backed by a shared, read-only dictionary.
///
/// Implementations are CPU-bound and may load their dictionary on first use,
/// so callers go through [`AnalysisService`], which runs them off the async
/// workers.
pub trait MorphologicalAnalyzer: Send + Sync {
    /// Best segmentation of `text`, possibly bracketed by dummy boundary
    /// morphemes.
    fn analyze(&self, text: &str) -> anyhow::Result<Vec<Morpheme>>;
}

#[derive(Clone)]
pub struct AnalysisService {
    analyzer: Arc<dyn MorphologicalAnalyzer>,
}

impl AnalysisService {
    pub fn new(analyzer: Arc<dyn MorphologicalAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// One `surface<TAB>features` line per morpheme.
    pub async fn describe(&self, text: &str) -> anyhow::Result<String> {
        // analyze takes &str but spawn_blocking needs 'static
        let analyzer = self.analyzer.clone();
        let text = text.to_string();
        let morphemes = tokio::task::spawn_blocking(move || analyzer.analyze(&text))
            .await
            .map_err(|err| anyhow::anyhow!("analysis task panicked: {err}"))??;
        Ok(format_morphemes(&morphemes))
    }
}

pub fn format_morphemes(morphemes: &[Morpheme]) -> String {
    morphemes
        .iter()
        .filter(|m| !m.is_dummy())
        .map(|m| format!("{}\t{}", m.surface, m.features.join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}
