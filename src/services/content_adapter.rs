use crate::db::types::{
    ContentField, ExerciseContent, ExerciseOption, ExerciseType, GrammarContent,
    ListeningContent, PromptContent, WritingContent,
};
use crate::schemas::exercise::ExerciseForm;
use crate::services::validation::is_blank;

const TITLE_FROM_INSTRUCTION_CHARS: usize = 30;
const FALLBACK_TITLE: &str = "New Exercise";

/// Narrows the flat form to the payload of `exercise_type`. Fields of other
/// types are dropped, blank blocks and options are filtered out and the
/// surviving options are renumbered from 0.
pub(crate) fn to_content(exercise_type: ExerciseType, form: &ExerciseForm) -> ExerciseContent {
    match exercise_type {
        ExerciseType::Vocabulary => ExerciseContent::Vocabulary(prompt_content(form)),
        ExerciseType::Conversation => ExerciseContent::Conversation(prompt_content(form)),
        ExerciseType::Grammar => ExerciseContent::Grammar(GrammarContent {
            reference_text: form.reference_text.clone(),
            display_text: form.display_text.clone(),
            correct_answer: form.correct_answer.clone(),
            blocks: clean_blocks(&form.blocks),
        }),
        ExerciseType::Listening => {
            let (options, correct_option_id) =
                clean_options(&form.options, form.correct_option_id);
            ExerciseContent::Listening(ListeningContent {
                prompt_audio: form.prompt_audio.clone(),
                display_text: non_blank(&form.display_text),
                options,
                correct_option_id,
                correct_answer: non_blank(&form.correct_answer),
            })
        }
        ExerciseType::Writing => {
            let (options, correct_option_id) =
                clean_options(&form.options, form.correct_option_id);
            ExerciseContent::Writing(WritingContent {
                display_text: form.display_text.clone(),
                options,
                correct_option_id: correct_option_id.unwrap_or(0),
            })
        }
    }
}

/// Expands stored content into the flat form; fields the type does not carry
/// are left empty.
pub(crate) fn from_content(content: &ExerciseContent) -> ExerciseForm {
    match content {
        ExerciseContent::Vocabulary(prompt) | ExerciseContent::Conversation(prompt) => {
            ExerciseForm {
                prompt_text: prompt.prompt_text.clone(),
                prompt_audio: prompt.prompt_audio.clone().unwrap_or_default(),
                correct_answer: prompt.correct_answer.clone(),
                blocks: prompt.blocks.clone(),
                ..ExerciseForm::default()
            }
        }
        ExerciseContent::Grammar(grammar) => ExerciseForm {
            reference_text: grammar.reference_text.clone(),
            display_text: grammar.display_text.clone(),
            correct_answer: grammar.correct_answer.clone(),
            blocks: grammar.blocks.clone(),
            ..ExerciseForm::default()
        },
        ExerciseContent::Listening(listening) => ExerciseForm {
            prompt_audio: listening.prompt_audio.clone(),
            display_text: listening.display_text.clone().unwrap_or_default(),
            correct_answer: listening.correct_answer.clone().unwrap_or_default(),
            options: listening.options.clone(),
            correct_option_id: listening.correct_option_id,
            ..ExerciseForm::default()
        },
        ExerciseContent::Writing(writing) => ExerciseForm {
            display_text: writing.display_text.clone(),
            options: writing.options.clone(),
            correct_option_id: Some(writing.correct_option_id),
            ..ExerciseForm::default()
        },
    }
}

/// Clears every field `exercise_type` does not carry, leaving the rest of the
/// draft untouched (blank rows included, since the user may still be typing).
pub(crate) fn retain_for_type(exercise_type: ExerciseType, form: ExerciseForm) -> ExerciseForm {
    let keep = |field: ContentField| exercise_type.allows(field);
    ExerciseForm {
        prompt_text: if keep(ContentField::PromptText) { form.prompt_text } else { String::new() },
        prompt_audio: if keep(ContentField::PromptAudio) { form.prompt_audio } else { String::new() },
        reference_text: if keep(ContentField::ReferenceText) {
            form.reference_text
        } else {
            String::new()
        },
        display_text: if keep(ContentField::DisplayText) { form.display_text } else { String::new() },
        correct_answer: if keep(ContentField::CorrectAnswer) {
            form.correct_answer
        } else {
            String::new()
        },
        blocks: if keep(ContentField::Blocks) { form.blocks } else { Vec::new() },
        options: if keep(ContentField::Options) { form.options } else { Vec::new() },
        correct_option_id: if keep(ContentField::CorrectOptionId) {
            form.correct_option_id
        } else {
            None
        },
    }
}

/// Removes the option at `index` and renumbers the rest from 0. The correct
/// option follows its option; removing it clears the choice.
/// Returns false when `index` is out of range.
pub(crate) fn remove_option(form: &mut ExerciseForm, index: usize) -> bool {
    if index >= form.options.len() {
        return false;
    }
    form.options.remove(index);
    for (position, option) in form.options.iter_mut().enumerate() {
        option.id = position as u32;
    }

    form.correct_option_id = match form.correct_option_id {
        Some(correct) if correct as usize == index => None,
        Some(correct) if correct as usize > index => Some(correct - 1),
        other => other,
    };
    true
}

/// A blank title falls back to the start of the instruction, then to a placeholder.
pub(crate) fn default_title(title: &str, instruction: &str) -> String {
    if !is_blank(title) {
        return title.to_string();
    }
    let excerpt: String = instruction.chars().take(TITLE_FROM_INSTRUCTION_CHARS).collect();
    if is_blank(&excerpt) {
        FALLBACK_TITLE.to_string()
    } else {
        excerpt
    }
}

fn prompt_content(form: &ExerciseForm) -> PromptContent {
    PromptContent {
        prompt_text: form.prompt_text.clone(),
        correct_answer: form.correct_answer.clone(),
        prompt_audio: non_blank(&form.prompt_audio),
        blocks: clean_blocks(&form.blocks),
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!is_blank(value)).then(|| value.to_string())
}

fn clean_blocks(blocks: &[String]) -> Vec<String> {
    blocks.iter().filter(|block| !is_blank(block)).cloned().collect()
}

/// Drops options without text and renumbers the rest. `correct` is a position
/// in `options`; it is mapped to the option's new position, or `None` when that
/// option was dropped.
fn clean_options(
    options: &[ExerciseOption],
    correct: Option<u32>,
) -> (Vec<ExerciseOption>, Option<u32>) {
    let mut kept = Vec::with_capacity(options.len());
    let mut remapped = None;
    for (position, option) in options.iter().enumerate() {
        if is_blank(&option.text) {
            continue;
        }
        let id = kept.len() as u32;
        if correct.is_some_and(|correct| correct as usize == position) {
            remapped = Some(id);
        }
        kept.push(ExerciseOption {
            id,
            text: option.text.clone(),
            option_audio_url: option.option_audio_url.clone(),
        });
    }
    (kept, remapped)
}
