use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use once_cell::sync::OnceCell;
use vibrato::{Dictionary, Tokenizer, dictionary::LexType};

use crate::{
    application::services::analyzer::MorphologicalAnalyzer,
    domain::{
        errors::DomainError,
        models::{Morpheme, MorphemeClass},
    },
};

/// Analyzer over a MeCab-compatible vibrato system dictionary.
///
/// The dictionary is read at most once, on first use or on [`preload`],
/// and then shared read-only by every call. Each call gets its own worker.
///
/// [`preload`]: VibratoAnalyzer::preload
pub struct VibratoAnalyzer {
    path: PathBuf,
    tokenizer: OnceCell<Tokenizer>,
}

impl VibratoAnalyzer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tokenizer: OnceCell::new(),
        }
    }

    #[cfg(test)]
    fn with_dictionary(dictionary: Dictionary) -> Self {
        Self {
            path: PathBuf::new(),
            tokenizer: OnceCell::with_value(Tokenizer::new(dictionary)),
        }
    }

    pub fn preload(&self) -> anyhow::Result<()> {
        self.tokenizer().map(|_| ())
    }

    fn tokenizer(&self) -> anyhow::Result<&Tokenizer> {
        self.tokenizer.get_or_try_init(|| {
            tracing::info!(path = %self.path.display(), "loading system dictionary");
            let dictionary = load_dictionary(&self.path).map_err(|err| {
                DomainError::Dictionary(format!("{}: {err:#}", self.path.display()))
            })?;
            Ok::<_, anyhow::Error>(Tokenizer::new(dictionary))
        })
    }
}

impl MorphologicalAnalyzer for VibratoAnalyzer {
    /// vibrato's token iterator skips the lattice's BOS/EOS nodes, so they are
    /// added back as dummy morphemes to keep the bracketed shape every
    /// analyzer returns.
    fn analyze(&self, text: &str) -> anyhow::Result<Vec<Morpheme>> {
        let tokenizer = self.tokenizer()?;
        let mut worker = tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();

        let mut morphemes = vec![Morpheme::boundary("BOS")];
        for token in worker.token_iter() {
            morphemes.push(Morpheme {
                surface: token.surface().to_string(),
                features: split_features(token.feature()),
                class: match token.lex_type() {
                    LexType::Unknown => MorphemeClass::Unknown,
                    _ => MorphemeClass::Known,
                },
            });
        }
        morphemes.push(Morpheme::boundary("EOS"));
        Ok(morphemes)
    }
}

fn load_dictionary(path: &Path) -> anyhow::Result<Dictionary> {
    let file = File::open(path).context("failed to open dictionary")?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "zst") {
        Box::new(zstd::Decoder::new(file).context("failed to start zstd decoder")?)
    } else {
        Box::new(BufReader::new(file))
    };
    Dictionary::read(reader).context("failed to read dictionary")
}

fn split_features(feature: &str) -> Vec<String> {
    if feature.is_empty() {
        return Vec::new();
    }
    feature.split(',').map(str::to_string).collect()
}
