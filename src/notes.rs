/*
Study material returned by the notes backend.

The backend is loose about shapes: questions may come as nested lists,
JSON inside strings, and with the correct answer under several spellings.
Everything is turned into `Mcq` / `Flashcard` here, once, so the rest of
the crate only ever sees the canonical form.
*/

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const OPTIONS_PER_QUESTION: usize = 4;

// Checked in order; the first key that resolves wins. Answer text is
// preferred over a bare index.
const ANSWER_KEYS: &[&str] = &["answer", "correct_answer", "Answer", "correct", "answer_index"];
const FLASHCARD_QUESTION_KEYS: &[&str] = &["question", "q", "front"];
const FLASHCARD_ANSWER_KEYS: &[&str] = &["answer", "a", "back"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize, // index into options
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyNotes {
    pub video_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub video_duration: f64, // minutes
    #[serde(default)]
    pub mcqs: Vec<Mcq>,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

// Lowercase, punctuation stripped, single spaces
fn normalize_text(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn flatten_objects(value: &Value, out: &mut Vec<Map<String, Value>>) {
    match value {
        Value::Object(map) => out.push(map.clone()),
        Value::Array(items) => {
            for item in items {
                flatten_objects(item, out);
            }
        }
        Value::String(text) => {
            if let Ok(inner) = serde_json::from_str::<Value>(text) {
                flatten_objects(&inner, out);
            }
        }
        _ => {}
    }
}

fn first_string<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn answer_from_text(text: &str, options: &[String]) -> Option<usize> {
    let trimmed = text.trim();

    // Option text first: options may themselves be numbers or letters
    let wanted = normalize_text(trimmed);
    if let Some(index) = options.iter().position(|o| normalize_text(o) == wanted) {
        return Some(index);
    }

    if let Ok(index) = trimmed.parse::<usize>() {
        return (index < options.len()).then_some(index);
    }

    // "B", "b.", "C)"
    let letter = trimmed.trim_end_matches(['.', ')', ':']);
    let mut chars = letter.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            let index = (c as u8 - b'A') as usize;
            if index < options.len() {
                return Some(index);
            }
        }
    }

    None
}

fn answer_from_value(value: &Value, options: &[String]) -> Option<usize> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .filter(|i| *i < options.len()),
        Value::String(s) => answer_from_text(s, options),
        _ => None,
    }
}

fn resolve_correct(map: &Map<String, Value>, options: &[String]) -> Option<usize> {
    ANSWER_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find_map(|v| answer_from_value(v, options))
}

fn mcq_from_object(map: &Map<String, Value>) -> Option<Mcq> {
    let question = map.get("question")?.as_str()?.trim().to_string();
    let options: Vec<String> = map
        .get("options")?
        .as_array()?
        .iter()
        .map(|o| o.as_str().map(|s| s.trim().to_string()))
        .collect::<Option<_>>()?;

    if question.is_empty() || options.len() != OPTIONS_PER_QUESTION {
        return None;
    }

    let correct = resolve_correct(map, &options)?;
    let explanation = map
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(Mcq {
        question,
        options,
        correct,
        explanation,
    })
}

/// Normalize the backend's `mcqs` field.
///
/// Items without a question, without exactly four options, or whose
/// correct answer cannot be resolved are dropped.
pub fn normalize_mcqs(raw: &Value) -> Vec<Mcq> {
    let mut objects = Vec::new();
    flatten_objects(raw, &mut objects);

    objects
        .iter()
        .filter_map(|obj| {
            let mcq = mcq_from_object(obj);
            if mcq.is_none() {
                let item = serde_json::Value::Object(obj.clone());
                tracing::warn!(%item, "dropping malformed question");
            }
            mcq
        })
        .collect()
}

fn question_marker() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^[ \t]*Q:").expect("flashcard pattern is valid"))
}

fn flashcard(question: &str, answer: &str) -> Option<Flashcard> {
    let (question, answer) = (question.trim(), answer.trim());
    if question.is_empty() || answer.is_empty() {
        return None;
    }
    Some(Flashcard {
        question: question.to_string(),
        answer: answer.to_string(),
    })
}

/// Parse plain-text `Q: ... A: ...` blocks. Each `Q:` must start a line.
pub fn parse_flashcard_text(text: &str) -> Vec<Flashcard> {
    question_marker()
        .split(text)
        .skip(1)
        .filter_map(|block| {
            let (question, answer) = block.split_once("A:")?;
            flashcard(question, answer)
        })
        .collect()
}

fn collect_flashcards(value: &Value, out: &mut Vec<Flashcard>) {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner @ (Value::Array(_) | Value::Object(_))) => collect_flashcards(&inner, out),
            _ => out.extend(parse_flashcard_text(text)),
        },
        Value::Object(map) => {
            let card = first_string(map, FLASHCARD_QUESTION_KEYS)
                .zip(first_string(map, FLASHCARD_ANSWER_KEYS))
                .and_then(|(q, a)| flashcard(q, a));
            out.extend(card);
        }
        Value::Array(items) => {
            for item in items {
                collect_flashcards(item, out);
            }
        }
        _ => {}
    }
}

/// Normalize the backend's `flashcards` field.
pub fn normalize_flashcards(raw: &Value) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    collect_flashcards(raw, &mut cards);
    cards
}

// "A".."Z", then plain numbers
fn option_label(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i).to_string())
        .unwrap_or_else(|| (index + 1).to_string())
}

impl StudyNotes {
    /// Render the notes as a Markdown document.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("# Study notes: {}\n\n", self.video_id);

        if self.video_duration > 0.0 {
            out.push_str(&format!("_Video length: {:.1} minutes_\n\n", self.video_duration));
        }

        out.push_str("## Summary\n\n");
        out.push_str(self.summary.trim());
        out.push_str("\n\n");

        if !self.mcqs.is_empty() {
            out.push_str("## Practice questions\n\n");
            for (n, mcq) in self.mcqs.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", n + 1, mcq.question));
                for (i, option) in mcq.options.iter().enumerate() {
                    out.push_str(&format!("   - {}. {}\n", option_label(i), option));
                }
                if let Some(answer) = mcq.options.get(mcq.correct) {
                    out.push_str(&format!(
                        "\n   **Answer:** {}. {}\n",
                        option_label(mcq.correct),
                        answer
                    ));
                }
                if !mcq.explanation.is_empty() {
                    out.push_str(&format!("\n   {}\n", mcq.explanation));
                }
                out.push('\n');
            }
        }

        if !self.flashcards.is_empty() {
            out.push_str("## Flashcards\n\n");
            for card in &self.flashcards {
                out.push_str(&format!("- **Q:** {}\n  **A:** {}\n", card.question, card.answer));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Value {
        json!(["It makes studying faster", "It improves long-term retention", "It reduces study time", "It makes content easier"])
    }

    #[test]
    fn every_answer_spelling_resolves_to_the_same_index() {
        let spellings = [
            json!({"correct": 1}),
            json!({"answer_index": 1}),
            json!({"Answer": "B"}),
            json!({"answer": "it improves long-term retention."}),
            json!({"correct_answer": "1"}),
        ];
        for extra in spellings {
            let mut item = json!({"question": "Why space reviews?", "options": options(), "explanation": "Spacing helps."});
            for (k, v) in extra.as_object().unwrap() {
                item[k] = v.clone();
            }
            let mcqs = normalize_mcqs(&json!([item]));
            assert_eq!(mcqs.len(), 1, "{extra}");
            assert_eq!(mcqs[0].correct, 1, "{extra}");
        }
    }

    #[test]
    fn numeric_options_match_answer_text_before_index() {
        let raw = json!([
            {"question": "2 + 2?", "options": ["3", "4", "5", "6"], "answer": "4"},
            {"question": "1 + 2?", "options": ["1", "2", "3", "4"], "answer": "3"},
            {"question": "2 + 3?", "options": ["2", "3", "4", "5"], "correct": 0, "correct_answer": "5"},
        ]);
        let correct: Vec<usize> = normalize_mcqs(&raw).iter().map(|m| m.correct).collect();
        assert_eq!(correct, vec![1, 2, 3]);
    }

    #[test]
    fn unmatched_answer_text_falls_back_to_index() {
        let raw = json!([{"question": "Q", "options": options(), "answer": "none of these", "correct": 2}]);
        assert_eq!(normalize_mcqs(&raw)[0].correct, 2);
    }

    #[test]
    fn flattens_nested_lists_and_json_strings() {
        let item = json!({"question": "Q1", "options": options(), "answer_index": 0});
        let encoded = serde_json::to_string(&json!([item.clone()])).unwrap();
        let raw = json!([[item.clone()], [encoded], item]);

        let mcqs = normalize_mcqs(&raw);
        assert_eq!(mcqs.len(), 3);
        assert!(mcqs.iter().all(|m| m.question == "Q1" && m.correct == 0));
    }

    #[test]
    fn drops_malformed_questions() {
        let raw = json!([
            {"question": "three options", "options": ["a", "b", "c"], "correct": 0},
            {"question": "out of range", "options": options(), "correct": 7},
            {"question": "no answer", "options": options()},
            {"options": options(), "correct": 0},
            "not json at all",
            42
        ]);
        assert!(normalize_mcqs(&raw).is_empty());
    }

    #[test]
    fn parses_flashcard_text_blocks() {
        let text = "Here are your cards:\nQ: What is spacing?\nA: Reviewing at growing intervals.\n\nQ: Who found the forgetting curve?\nA: Ebbinghaus\nQ: Empty answer\nA:   ";
        let cards = parse_flashcard_text(text);
        assert_eq!(
            cards,
            vec![
                Flashcard {
                    question: "What is spacing?".into(),
                    answer: "Reviewing at growing intervals.".into()
                },
                Flashcard {
                    question: "Who found the forgetting curve?".into(),
                    answer: "Ebbinghaus".into()
                },
            ]
        );
    }

    #[test]
    fn flashcards_from_mixed_shapes() {
        let raw = json!([
            "Q: one\nA: 1",
            {"q": "two", "a": "2"},
            [{"front": "three", "back": "3"}, "Q: four\nA: 4"],
            {"question": "missing answer"}
        ]);
        let questions: Vec<String> = normalize_flashcards(&raw).into_iter().map(|c| c.question).collect();
        assert_eq!(questions, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn markdown_export_lists_answer_and_cards() {
        let notes = StudyNotes {
            video_id: "dQw4w9WgXcQ".into(),
            summary: "Spacing beats cramming.".into(),
            transcript: String::new(),
            video_duration: 15.7,
            mcqs: vec![Mcq {
                question: "Why space reviews?".into(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct: 2,
                explanation: "Because.".into(),
            }],
            flashcards: vec![Flashcard {
                question: "Q?".into(),
                answer: "A.".into(),
            }],
        };
        let md = notes.to_markdown();
        assert!(md.starts_with("# Study notes: dQw4w9WgXcQ\n"));
        assert!(md.contains("_Video length: 15.7 minutes_"));
        assert!(md.contains("1. Why space reviews?\n   - A. a\n"));
        assert!(md.contains("**Answer:** C. c"));
        assert!(md.contains("- **Q:** Q?\n  **A:** A.\n"));
    }

    #[test]
    fn markdown_export_handles_long_option_lists() {
        let notes = StudyNotes {
            video_id: "x".into(),
            summary: String::new(),
            transcript: String::new(),
            video_duration: 0.0,
            mcqs: vec![Mcq {
                question: "Pick one".into(),
                options: (0..200).map(|i| format!("opt{i}")).collect(),
                correct: 199,
                explanation: String::new(),
            }],
            flashcards: vec![],
        };
        let md = notes.to_markdown();
        assert!(md.contains("   - Z. opt25\n"));
        assert!(md.contains("   - 27. opt26\n"));
        assert!(md.contains("**Answer:** 200. opt199"));
    }
}
