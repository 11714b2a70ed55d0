//! Built-in course content for `--offline` runs against the in-memory
//! backend.

use backend::LessonPayload;
use lingo_core::model::{Language, MatchPair, QuestionDraft};

pub fn demo_lessons() -> Vec<(Language, LessonPayload)> {
    vec![
        (
            Language::Spanish,
            LessonPayload {
                lesson: 1,
                title: "Basics 1".into(),
                xp: 10,
                questions: vec![
                    QuestionDraft::Translation {
                        question: "the dog".into(),
                        answer: "el perro".into(),
                        instruction: None,
                    },
                    QuestionDraft::MultipleChoice {
                        question: "Which one means \"the cat\"?".into(),
                        options: vec!["el gato".into(), "el perro".into(), "la casa".into()],
                        answer: "el gato".into(),
                        instruction: None,
                    },
                    QuestionDraft::FillInBlank {
                        question: "Yo ____ un libro".into(),
                        answer: "leo".into(),
                        instruction: None,
                    },
                ],
            },
        ),
        (
            Language::Spanish,
            LessonPayload {
                lesson: 2,
                title: "Basics 2".into(),
                xp: 15,
                questions: vec![
                    QuestionDraft::Matching {
                        question: "Match the animals".into(),
                        pairs: vec![
                            MatchPair::new("dog", "perro"),
                            MatchPair::new("cat", "gato"),
                            MatchPair::new("bird", "pájaro"),
                        ],
                        instruction: None,
                    },
                    QuestionDraft::SentenceTransformation {
                        question: "I drink water".into(),
                        answer: "yo bebo agua".into(),
                        instruction: None,
                    },
                ],
            },
        ),
        (
            Language::French,
            LessonPayload {
                lesson: 1,
                title: "Basics 1".into(),
                xp: 10,
                questions: vec![
                    QuestionDraft::Translation {
                        question: "the dog".into(),
                        answer: "le chien".into(),
                        instruction: None,
                    },
                    QuestionDraft::FillInBlank {
                        question: "Je ____ une pomme".into(),
                        answer: "mange".into(),
                        instruction: None,
                    },
                ],
            },
        ),
    ]
}
