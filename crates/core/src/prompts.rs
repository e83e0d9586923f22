use thiserror::Error;

/// Errors that can occur while building a prompt set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PromptSetError {
    #[error("exposure prompt list is empty")]
    NoExposurePrompts,

    #[error("reflection question list is empty")]
    NoReflectionQuestions,
}

/// Fixed, ordered catalog of exposure prompts and reflection questions.
///
/// Built once at startup and shared read-only by every session; prompts are
/// never added or reordered while a session is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    exposure: Vec<String>,
    reflection: Vec<String>,
}

impl PromptSet {
    /// Build a prompt set from custom lists.
    ///
    /// # Errors
    ///
    /// Returns `PromptSetError` if either list is empty.
    pub fn new(
        exposure: impl IntoIterator<Item = impl Into<String>>,
        reflection: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, PromptSetError> {
        let exposure: Vec<String> = exposure.into_iter().map(Into::into).collect();
        let reflection: Vec<String> = reflection.into_iter().map(Into::into).collect();

        if exposure.is_empty() {
            return Err(PromptSetError::NoExposurePrompts);
        }
        if reflection.is_empty() {
            return Err(PromptSetError::NoReflectionQuestions);
        }

        Ok(Self {
            exposure,
            reflection,
        })
    }

    /// The built-in guided catalog: ten exposure prompts walking through the
    /// feared scenario, followed by five post-exposure debrief questions.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            exposure: [
                "Imagine the worst-case scenario happening. Where are you when you find out?",
                "How do you find out about this situation? What's the first thing you do after hearing the news?",
                "What do you feel in this moment? How does your body react?",
                "What thoughts are running through your mind?",
                "How do your loved ones respond to this situation?",
                "What's the most challenging part of this scenario for you?",
                "How does this situation affect your daily life?",
                "What's the long-term impact of this worst-case scenario?",
                "How do you see yourself coping with this situation?",
                "What resources or support do you have available in this scenario?",
            ]
            .map(str::to_owned)
            .into(),
            reflection: [
                "How do you feel now compared to the beginning of the session?",
                "Did the worst-case scenario feel as bad as you expected it to?",
                "What did you learn about your ability to sit with the discomfort of this worry?",
                "Did you notice any changes in your physical sensations during the session?",
                "What strategies, if any, did you use to manage your anxiety during the exposure?",
            ]
            .map(str::to_owned)
            .into(),
        }
    }

    #[must_use]
    pub fn exposure_prompts(&self) -> &[String] {
        &self.exposure
    }

    #[must_use]
    pub fn reflection_questions(&self) -> &[String] {
        &self.reflection
    }

    /// Number of exposure prompts in the catalog.
    #[must_use]
    pub fn exposure_len(&self) -> usize {
        self.exposure.len()
    }

    /// Number of reflection questions in the catalog.
    #[must_use]
    pub fn reflection_len(&self) -> usize {
        self.reflection.len()
    }

    #[must_use]
    pub fn exposure_prompt(&self, index: usize) -> Option<&str> {
        self.exposure.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn reflection_question(&self, index: usize) -> Option<&str> {
        self.reflection.get(index).map(String::as_str)
    }
}

/// A sample worry paired with practical coping suggestions.
///
/// Shown on request at the input stage to help someone who is struggling to
/// put their own worry into words. Static content, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleWorry {
    worry: String,
    solutions: Vec<String>,
}

impl ExampleWorry {
    #[must_use]
    pub fn new(
        worry: impl Into<String>,
        solutions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            worry: worry.into(),
            solutions: solutions.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in catalog: three common worries with five suggestions each.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::new(
                "Losing my job",
                [
                    "Update your resume and LinkedIn profile",
                    "Network within your industry",
                    "Learn new skills to increase your value",
                    "Create an emergency fund",
                    "Explore alternative career options",
                ],
            ),
            Self::new(
                "Health concerns",
                [
                    "Schedule regular check-ups with your doctor",
                    "Adopt a healthy diet and exercise routine",
                    "Practice stress-reduction techniques like meditation",
                    "Get adequate sleep",
                    "Stay informed about preventive care",
                ],
            ),
            Self::new(
                "Financial instability",
                [
                    "Create a budget and stick to it",
                    "Seek advice from a financial advisor",
                    "Look for additional income sources",
                    "Reduce unnecessary expenses",
                    "Learn about investing and saving strategies",
                ],
            ),
        ]
    }

    #[must_use]
    pub fn worry(&self) -> &str {
        &self.worry
    }

    #[must_use]
    pub fn solutions(&self) -> &[String] {
        &self.solutions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_expected_shape() {
        let prompts = PromptSet::builtin();
        assert_eq!(prompts.exposure_len(), 10);
        assert_eq!(prompts.reflection_len(), 5);
    }

    #[test]
    fn empty_lists_are_rejected() {
        let err = PromptSet::new(Vec::<String>::new(), vec!["q"]).unwrap_err();
        assert_eq!(err, PromptSetError::NoExposurePrompts);

        let err = PromptSet::new(vec!["p"], Vec::<String>::new()).unwrap_err();
        assert_eq!(err, PromptSetError::NoReflectionQuestions);
    }

    #[test]
    fn prompts_are_indexed_in_order() {
        let prompts = PromptSet::new(vec!["first", "second"], vec!["debrief"]).unwrap();
        assert_eq!(prompts.exposure_prompt(0), Some("first"));
        assert_eq!(prompts.exposure_prompt(1), Some("second"));
        assert_eq!(prompts.exposure_prompt(2), None);
        assert_eq!(prompts.reflection_question(0), Some("debrief"));
    }

    #[test]
    fn builtin_example_worries_have_expected_shape() {
        let examples = ExampleWorry::builtin();
        assert_eq!(examples.len(), 3);
        for example in &examples {
            assert!(!example.worry().is_empty());
            assert_eq!(example.solutions().len(), 5);
        }
        assert_eq!(examples[0].worry(), "Losing my job");
        assert_eq!(
            examples[0].solutions()[0],
            "Update your resume and LinkedIn profile"
        );
    }
}
