//! Ready-made scene configurations built on the [`SceneBuilder`](crate::SceneBuilder) DSL.
//!
//! [`vocation`] holds the eight vocabulary-card scenes; [`explainer`] holds the chain-timed title
//! scene used to open explainer clips.

pub mod explainer;
pub mod vocation;

use crate::foundation::error::{FramecueError, FramecueResult};

/// Text shown by the vocabulary scenes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VocabularyCard {
    /// Headword.
    pub word: String,
    /// Translation or short gloss.
    pub meaning: String,
    /// Example sentences; scenes pick one by index, wrapping around.
    pub examples: Vec<String>,
    /// Word-root hint shown as a footer.
    #[serde(default)]
    pub hint: String,
}

impl Default for VocabularyCard {
    fn default() -> Self {
        Self {
            word: "vocation".to_owned(),
            meaning: "天职".to_owned(),
            examples: vec![
                "Teaching is her vocation.".to_owned(),
                "He found his vocation in medicine.".to_owned(),
                "Nursing became her vocation.".to_owned(),
            ],
            hint: "voc = call".to_owned(),
        }
    }
}

impl VocabularyCard {
    /// Card with a single example sentence and no hint.
    pub fn new(
        word: impl Into<String>,
        meaning: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            examples: vec![example.into()],
            hint: String::new(),
        }
    }

    /// Add another example sentence.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Set the footer hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Require a headword and at least one example.
    pub fn validate(&self) -> FramecueResult<()> {
        if self.word.trim().is_empty() {
            return Err(FramecueError::validation("vocabulary card word must be non-empty"));
        }
        if self.examples.is_empty() {
            return Err(FramecueError::validation(format!(
                "vocabulary card '{}' needs at least one example",
                self.word
            )));
        }
        Ok(())
    }

    /// Example `index`, wrapping around the list.
    pub fn example(&self, index: usize) -> &str {
        if self.examples.is_empty() {
            return "";
        }
        &self.examples[index % self.examples.len()]
    }
}
