use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ExerciseType {
    Vocabulary,
    Grammar,
    Conversation,
    Listening,
    Writing,
}

/// One field of the flat exercise form. The names match the form's JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentField {
    PromptText,
    PromptAudio,
    ReferenceText,
    DisplayText,
    CorrectAnswer,
    Blocks,
    Options,
    CorrectOptionId,
}

impl ContentField {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ContentField::PromptText => "promptText",
            ContentField::PromptAudio => "promptAudio",
            ContentField::ReferenceText => "referenceText",
            ContentField::DisplayText => "displayText",
            ContentField::CorrectAnswer => "correctAnswer",
            ContentField::Blocks => "blocks",
            ContentField::Options => "options",
            ContentField::CorrectOptionId => "correctOptionId",
        }
    }
}

impl ExerciseType {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Vocabulary => "vocabulary",
            ExerciseType::Grammar => "grammar",
            ExerciseType::Conversation => "conversation",
            ExerciseType::Listening => "listening",
            ExerciseType::Writing => "writing",
        }
    }

    pub(crate) fn required_fields(self) -> &'static [ContentField] {
        use ContentField::*;
        match self {
            ExerciseType::Vocabulary | ExerciseType::Conversation => &[PromptText, CorrectAnswer],
            ExerciseType::Grammar => &[ReferenceText, DisplayText, CorrectAnswer],
            ExerciseType::Listening => &[PromptAudio],
            ExerciseType::Writing => &[DisplayText, Options, CorrectOptionId],
        }
    }

    pub(crate) fn optional_fields(self) -> &'static [ContentField] {
        use ContentField::*;
        match self {
            ExerciseType::Vocabulary | ExerciseType::Conversation => &[PromptAudio, Blocks],
            ExerciseType::Grammar => &[Blocks],
            ExerciseType::Listening => &[DisplayText, Options, CorrectOptionId, CorrectAnswer],
            ExerciseType::Writing => &[],
        }
    }

    pub(crate) fn allows(self, field: ContentField) -> bool {
        self.required_fields().contains(&field) || self.optional_fields().contains(&field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ExerciseOption {
    #[serde(default)]
    pub(crate) id: u32,
    #[serde(default)]
    pub(crate) text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) option_audio_url: Option<String>,
}

/// Payload shared by vocabulary and conversation exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptContent {
    pub(crate) prompt_text: String,
    pub(crate) correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) prompt_audio: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) blocks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GrammarContent {
    pub(crate) reference_text: String,
    pub(crate) display_text: String,
    pub(crate) correct_answer: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) blocks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListeningContent {
    pub(crate) prompt_audio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) display_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) options: Vec<ExerciseOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) correct_option_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WritingContent {
    pub(crate) display_text: String,
    pub(crate) options: Vec<ExerciseOption>,
    pub(crate) correct_option_id: u32,
}

/// Exercise payload. The variant is the exercise's type, so a stored exercise
/// can never carry fields that belong to another type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub(crate) enum ExerciseContent {
    Vocabulary(PromptContent),
    Conversation(PromptContent),
    Grammar(GrammarContent),
    Listening(ListeningContent),
    Writing(WritingContent),
}

impl ExerciseContent {
    pub(crate) fn exercise_type(&self) -> ExerciseType {
        match self {
            ExerciseContent::Vocabulary(_) => ExerciseType::Vocabulary,
            ExerciseContent::Conversation(_) => ExerciseType::Conversation,
            ExerciseContent::Grammar(_) => ExerciseType::Grammar,
            ExerciseContent::Listening(_) => ExerciseType::Listening,
            ExerciseContent::Writing(_) => ExerciseType::Writing,
        }
    }
}
