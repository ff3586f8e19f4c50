//! Prompt templates.

use crate::models::NO_ANSWER_SENTINEL;

/// Directives that suppress preamble and meta-commentary.
const DIRECTIVES: &str = "`reset`
`no quotes`
`no explanations`
`no prompt`
`no self-reference`
`no apologies`
`no filler`
`just answer`";

/// Prompt asking for at most five keyword combinations, one per line.
#[must_use]
pub fn keyword_prompt(research_question: &str) -> String {
    format!(
        "{DIRECTIVES}

Generate several keyword combinations based on the following research question: {research_question}.
Don't generate more than 5 keyword combinations.

The output should be structured like this:
Write \"KeywordCombination:\" and then list the keywords like so \"Keyword,Keyword,Keyword\"
"
    )
}

/// Prompt asking for the answer to the question found in one abstract.
#[must_use]
pub fn extraction_prompt(research_question: &str, abstract_text: &str) -> String {
    format!(
        "{DIRECTIVES}

I will give you the abstract of an academic paper. Extract the answer to this research question: {research_question} from the abstract.

If the answer is not in the abstract, then you are only allowed to respond with '{NO_ANSWER_SENTINEL}' and nothing else.

This is the abstract: {abstract_text}
"
    )
}

/// Prompt asking for a cited literature review over the joined findings.
#[must_use]
pub fn synthesis_prompt(research_question: &str, findings: &str) -> String {
    format!(
        "{DIRECTIVES}

I will give you a list of research findings and a research question.

Synthesize the list of research findings to generate a scientific literature review. Also, identify knowledge gaps and future research directions.

Make sure to always reference every research finding you use with in-text citations in APA format using the source provided after SOURCE.

Only use the research findings I provide you with to create your literature review. Only give me the output and nothing else.

Now, using the concepts above, create a literature review for this research question '{research_question}' using the following research findings:

{findings}
"
    )
}
