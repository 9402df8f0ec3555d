/// Quick-reply prompts offered under the transcript.
///
/// Replaced wholesale; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionSet {
    prompts: Vec<String>,
}

impl SuggestionSet {
    pub fn new(prompts: Vec<String>) -> Self {
        Self { prompts }
    }

    pub fn replace(&mut self, prompts: Vec<String>) {
        self.prompts = prompts;
    }

    pub fn clear(&mut self) {
        self.prompts.clear();
    }

    pub fn contains(&self, prompt: &str) -> bool {
        self.prompts.iter().any(|p| p == prompt)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.prompts
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }
}
