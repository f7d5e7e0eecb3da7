//! Prompt building for the LLM collaborator.
//!
//! One builder per collaborator call: intake, adaptive question,
//! hypothesis update, confidence evaluation, final narrative. All
//! builders are pure string construction.

use triage_common::{AnswerRecord, Domain, DomainPolicy, HypothesisSet};

/// Intake: summarize the issue, rate urgency, propose initial hypotheses.
pub fn build_intake_prompt(message: &str) -> String {
    format!(
        r#"You are a diagnostic expert who listens to problems and figures out what might be wrong.

Analyze what the user is telling you and:
1. Understand the core problem in simple terms
2. Generate 3-4 possible reasons WHY this is happening
3. For each reason, estimate how likely it is (higher % = more confident)
4. Rate the urgency: low/moderate/high

User's problem:
"{message}"

Think like:
- What are the most common causes of this issue?
- Which one seems most likely given what they said?
- Are any of these dangerous/urgent?

Return ONLY valid JSON:
{{
    "main_issue": "simple 1-sentence problem description",
    "risk_level": "low/moderate/high",
    "hypotheses": [
        {{
            "name": "simple cause name",
            "description": "why this might be happening (plain English)",
            "probability": 0.6,
            "key_evidence": ["things that would prove this", "things that would disprove this"]
        }}
    ]
}}"#
    )
}

/// Adaptive question: one new multiple-choice question that narrows the
/// top two hypotheses, biased away from everything already asked.
pub fn build_question_prompt(
    main_issue: &str,
    hypotheses: &HypothesisSet,
    answers_history: &[AnswerRecord],
    asked_questions: &[String],
) -> String {
    let top = hypotheses.top_k(2);
    let (top_name, top_prob) = top
        .first()
        .map(|h| (h.name.as_str(), h.probability))
        .unwrap_or(("Unknown", 0.0));
    let (second_name, second_prob) = top
        .get(1)
        .map(|h| (h.name.as_str(), h.probability))
        .unwrap_or(("Unknown", 0.0));

    // Last three answers only; older context adds noise.
    let answers_summary = if answers_history.is_empty() {
        "Just started".to_string()
    } else {
        answers_history
            .iter()
            .rev()
            .take(3)
            .rev()
            .map(|record| format!("- {}", record.answer))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let asked_list = if asked_questions.is_empty() {
        "None yet".to_string()
    } else {
        asked_questions
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let domain = triage_common::classify(main_issue).label();

    format!(
        r#"You are a smart diagnostic AI. Act like a helpful expert having a natural conversation.

CONTEXT:
- Issue: {main_issue}
- Domain: {domain}
- Questions already asked: {asked_count}
- Top 2 hypotheses:
  1. {top_name} ({top_pct:.0}%)
  2. {second_name} ({second_pct:.0}%)

What we know so far:
{answers_summary}

Questions ALREADY ASKED (NEVER REPEAT THESE):
{asked_list}

YOUR JOB:
Generate ONE clever follow-up question that:
1. Is natural and conversational - like you're learning as you go
2. Is COMPLETELY DIFFERENT from questions already asked
3. Narrows down between the top 2 hypotheses
4. Asks about OBSERVABLE FACTS only
5. Gets information we DON'T have yet

Think about what distinguishes {top_name} vs {second_name}:
- What evidence would support one over the other?
- What do we still NOT know?
- Ask about that, with 3-4 realistic observable options.

Return ONLY valid JSON (no markdown, no code blocks):
{{
    "question": "your smart conversational question",
    "options": ["option 1", "option 2", "option 3"],
    "reasoning": "why this question helps narrow it down"
}}"#,
        asked_count = asked_questions.len(),
        top_pct = top_prob * 100.0,
        second_pct = second_prob * 100.0,
    )
}

/// Hypothesis update: re-estimate every probability given the latest
/// answer.
pub fn build_update_prompt(
    main_issue: &str,
    hypotheses: &HypothesisSet,
    last_question: &str,
    last_answer: &str,
) -> String {
    let hyp_text = hypotheses
        .iter()
        .map(|h| {
            format!(
                "- {}: {} (current: {:.0}%)",
                h.name,
                h.description,
                h.probability * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a Bayesian reasoning expert. Given the latest answer, update the probability of each hypothesis.

Issue: {main_issue}

Current Hypotheses:
{hyp_text}

Latest Question: {last_question}
Latest Answer: {last_answer}

For each hypothesis:
1. Does this answer support it? How much?
2. Does this answer contradict it?
3. What's the new probability? (0.0 to 1.0)

Return ONLY valid JSON:
{{
    "updated_hypotheses": [
        {{
            "name": "hypothesis name",
            "new_probability": 0.7,
            "reasoning": "why probability changed"
        }}
    ]
}}"#
    )
}

/// Confidence evaluation: hand the collaborator the computed numbers and
/// the domain thresholds, ask for an advisory score and verdict.
pub fn build_confidence_prompt(
    main_issue: &str,
    hypotheses: &HypothesisSet,
    answer_count: u32,
    domain: Domain,
    policy: &DomainPolicy,
) -> String {
    let top = hypotheses.top_k(2);
    let top_name = top.first().map(|h| h.name.as_str()).unwrap_or("unknown");
    let top_prob = top.first().map(|h| h.probability).unwrap_or(0.0);
    let second_name = top.get(1).map(|h| h.name.as_str()).unwrap_or("none");
    let second_prob = top.get(1).map(|h| h.probability).unwrap_or(0.0);
    let issue_type = domain.policy_key().to_uppercase();

    format!(
        r#"You are deciding if we have enough information to give final advice.

Issue Type: {issue_type}
Original Issue: {main_issue}

Top hypothesis: {top_name} (confidence: {top_pct:.0}%)
Second best: {second_name} (confidence: {second_pct:.0}%)
Confidence gap: {gap_pct:.0}%
Questions asked so far: {answer_count}

THRESHOLDS for {issue_type} issues:
- Minimum confidence needed: {min_conf:.0}%
- Minimum questions needed: {min_questions}
- Confidence gap needed: {min_gap:.0}%

CRITICAL RULE for HEALTH issues:
- NEVER give medical advice with less than {min_questions} questions
- ALWAYS recommend seeing a professional if any doubt
- Better to ask 1 more question than to give bad advice

STOP (give final advice) only when ALL of these are true:
1. Confidence >= {min_conf:.0}%
2. Questions asked >= {min_questions}
3. Gap between top 2 >= {min_gap:.0}%

KEEP ASKING if ANY of these are true:
- Confidence < {min_conf:.0}%
- Questions < {min_questions}
- Gap < {min_gap:.0}%

Return ONLY valid JSON:
{{
    "confidence_score": 0.75,
    "verdict": "CONTINUE or STOP",
    "reasoning": "why this decision"
}}"#,
        top_pct = top_prob * 100.0,
        second_pct = second_prob * 100.0,
        gap_pct = (top_prob - second_prob) * 100.0,
        min_conf = policy.min_confidence * 100.0,
        min_questions = policy.min_questions,
        min_gap = policy.min_gap * 100.0,
    )
}

/// Final narrative: 2-3 short statements, no questions, no lists.
pub fn build_final_prompt(main_issue: &str, top_hypothesis: &str, domain: Domain) -> String {
    let disclaimer = match domain {
        Domain::Health => "See a doctor if symptoms persist or worsen.\n\n",
        Domain::General => "",
    };

    format!(
        r#"FINAL ANSWER: 2-3 SHORT SENTENCES. NO QUESTIONS. NO LISTS.

Diagnosis: {top_hypothesis}
Issue: {main_issue}

Rules:
- Write STATEMENTS, not questions
- Keep each sentence SHORT (under 20 words)
- DO NOT ask questions
- Only give advice/conclusion

Format:
"Yeah, probably [cause]. [Why/what to do]. [Action or professional help]."

{disclaimer}WRITE NOW (statements only, 2-3 sentences):"#
    )
}
