//! Reference list assembly tests.

use proptest::prelude::*;

use autoresearcher::models::{Answer, ReferenceList};
use autoresearcher::pipeline::assemble;

// =============================================================================
// Ordering and Extraction
// =============================================================================

#[test]
fn test_assemble_keeps_answer_order() {
    let answers = [
        "AI improves diagnosis. SOURCE: Smith (2020)",
        "AI raises cost concerns. SOURCE: Jones (2021)",
    ];

    let references = assemble(&answers);

    assert_eq!(references.citations(), ["Smith (2020)", "Jones (2021)"]);
    assert_eq!(references.render(), "1. Smith (2020)\n2. Jones (2021)");
}

#[test]
fn test_assemble_empty() {
    let answers: [&str; 0] = [];
    let references = assemble(&answers);
    assert!(references.is_empty());
    assert_eq!(references.render(), "");
}

#[test]
fn test_assemble_keeps_duplicates() {
    let answers = ["A. SOURCE: Smith (2020)", "B. SOURCE: Smith (2020)"];
    let references = assemble(&answers);
    assert_eq!(references.render(), "1. Smith (2020)\n2. Smith (2020)");
}

#[test]
fn test_assemble_skips_answers_without_marker() {
    let answers = ["A. SOURCE: One", "no marker here", "C. SOURCE: Three"];
    let references = assemble(&answers);
    assert_eq!(references.citations(), ["One", "Three"]);
}

#[test]
fn test_assemble_uses_last_marker() {
    let answers = ["Quoting SOURCE: inside the finding SOURCE: Real (2019)"];
    assert_eq!(assemble(&answers).citations(), ["Real (2019)"]);
}

#[test]
fn test_assemble_rendered_answers() {
    let answers: Vec<String> = vec![
        Answer::new("Finding one.", "https://example.org/one").render(),
        Answer::new("Finding two.", "paper.pdf").render(),
    ];
    assert_eq!(
        assemble(answers.as_slice()),
        ReferenceList::new(vec!["https://example.org/one".to_string(), "paper.pdf".to_string()])
    );
}

// =============================================================================
// Properties
// =============================================================================

fn arb_answer() -> impl Strategy<Value = String> {
    prop_oneof![
        ("[A-Za-z .]{1,40}", "[A-Za-z(),. 0-9]{0,30}")
            .prop_map(|(finding, citation)| format!("{finding} SOURCE: {citation}")),
        "[a-z ]{0,40}",
    ]
}

proptest! {
    /// Skipped answers only ever shrink the reference list.
    #[test]
    fn assemble_never_exceeds_answer_count(answers in prop::collection::vec(arb_answer(), 0..20)) {
        let references = assemble(answers.as_slice());
        prop_assert!(references.len() <= answers.len());
    }

    /// Rendering the same references twice gives identical output.
    #[test]
    fn render_is_idempotent(answers in prop::collection::vec(arb_answer(), 0..20)) {
        let references = assemble(answers.as_slice());
        prop_assert_eq!(references.render(), references.render());
        prop_assert_eq!(references.render().lines().count(), references.len());
    }

    /// Every well-formed answer contributes exactly its citation.
    #[test]
    fn assemble_recovers_citations(
        pairs in prop::collection::vec(("[A-Za-z .]{1,40}", "[A-Za-z(),. 0-9]{1,30}"), 0..20)
    ) {
        let answers: Vec<String> =
            pairs.iter().map(|(f, c)| Answer::new(f.as_str(), c.as_str()).render()).collect();
        let expected: Vec<String> = pairs.into_iter().map(|(_, c)| c).collect();
        let references = assemble(answers.as_slice());
        prop_assert_eq!(references.citations(), expected.as_slice());
    }
}
