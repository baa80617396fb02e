use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MorphemeClass {
    Known,
    Unknown,
    /// Sentence boundary marker (BOS/EOS) without linguistic content.
    Dummy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Morpheme {
    pub surface: String,
    pub features: Vec<String>,
    pub class: MorphemeClass,
}

impl Morpheme {
    pub fn boundary(surface: &str) -> Self {
        Self {
            surface: surface.to_string(),
            features: Vec::new(),
            class: MorphemeClass::Dummy,
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.class == MorphemeClass::Dummy
    }
}
