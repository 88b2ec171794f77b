//! Prompt templates for every agent identity.
//!
//! Every template ends by demanding an explicit `Score: Rate X/10` line so
//! the shared score extractor finds a labeled value; narratives that omit it
//! fall back to the documented default.

use designsight_core::{AgentId, DebateRole, DebateTurn, Payload};

fn persona(id: AgentId) -> &'static str {
    match id {
        AgentId::Brand => "You are a Brand Strategist expert.",
        AgentId::Aesthetic => "You are a Design Aesthetics Expert.",
        AgentId::Conversion => "You are a CRO specialist.",
        AgentId::Monetization => "You are a Monetization Strategy Expert.",
        AgentId::Privacy => "You are a Privacy and Security UX Expert.",
        AgentId::Ethical => "You are an Ethical Design Advocate.",
        AgentId::Trends => "You are a Design Trend Analyst.",
        AgentId::WebSearch => "You are a web research specialist.",
        AgentId::Arxiv => "You are an academic research specialist focused on preprint literature.",
        AgentId::SemanticScholar => "You are a citation-graph analyst.",
        AgentId::PubMed => "You are a biomedical literature specialist.",
        AgentId::ClinicalTrials => "You are a clinical trials analyst.",
        AgentId::MarketData => "You are a financial markets analyst.",
        AgentId::Perplexity => "You are a real-time knowledge synthesis specialist.",
        AgentId::Reddit => "You are a community sentiment analyst.",
        AgentId::YouTube => "You are a video content analyst.",
        AgentId::GitHub => "You are an open-source ecosystem analyst.",
        AgentId::ContextAnalyzer => "You are a document analyst working from user-supplied material.",
        AgentId::Judge | AgentId::Debate => "",
    }
}

fn instructions(id: AgentId) -> &'static str {
    match id {
        AgentId::Brand => {
            "Analyze brand consistency:\n\
             1. Brand Alignment - Values reflection\n\
             2. Color Guidelines - Brand color adherence\n\
             3. Typography - Brand font usage\n\
             4. Tone & Voice - Communication style\n\
             5. Logo & Assets - Implementation\n\
             6. Score: Rate X/10 (MUST include)"
        }
        AgentId::Aesthetic => {
            "Analyze aesthetic quality:\n\
             1. Visual Appeal - First impression\n\
             2. Balance & Harmony - Composition\n\
             3. Modernity - Contemporary design\n\
             4. Sophistication - Polish level\n\
             5. Emotional Impact - Feelings evoked\n\
             6. Score: Rate X/10 (MUST include)"
        }
        AgentId::Conversion => {
            "Analyze conversion potential:\n\
             1. CTA Analysis - Effectiveness\n\
             2. Layout Optimization - Funnel design\n\
             3. Friction Points - Journey obstacles\n\
             4. Trust Signals - Credibility\n\
             5. Value Proposition - Clarity\n\
             6. Score: Rate X/10 (MUST include)"
        }
        AgentId::Monetization => {
            "Analyze monetization potential:\n\
             1. Revenue Surfaces - Visibility\n\
             2. Pricing Presentation - Clarity\n\
             3. Upsell Paths - Placement\n\
             4. Willingness Signals - Perceived value\n\
             5. Checkout Flow - Friction\n\
             6. Score: Rate X/10 (MUST include)"
        }
        AgentId::Privacy => {
            "Analyze privacy & security:\n\
             1. Data Collection - Transparency\n\
             2. Privacy Controls - User control\n\
             3. Security Patterns - Trust signals\n\
             4. GDPR Compliance - Regulation adherence\n\
             5. Cookie Consent - Implementation\n\
             6. Score: Rate X/10 (MUST include)"
        }
        AgentId::Ethical => {
            "Conduct ethical audit:\n\
             1. Dark Patterns - Manipulative UX\n\
             2. Transparency - Honest communication\n\
             3. User Autonomy - Choice and control\n\
             4. Addictive Design - Unhealthy tactics\n\
             5. Inclusivity - Bias check\n\
             6. Score: Rate X/10 (MUST include)"
        }
        AgentId::Trends => {
            "Analyze trend alignment:\n\
             1. Current Trends - Adoption\n\
             2. Visual Language - Freshness\n\
             3. Interaction Patterns - Modernity\n\
             4. Longevity - Staying power\n\
             5. Differentiation - Standing out\n\
             6. Score: Rate X/10 (MUST include)"
        }
        AgentId::WebSearch => {
            "Survey current web coverage of the question:\n\
             1. Key Findings - What reliable sources report\n\
             2. Recency - How fresh the coverage is\n\
             3. Disagreements - Where sources conflict\n\
             4. Gaps - What remains unanswered\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::Arxiv => {
            "Assess the question against preprint literature:\n\
             1. Relevant Papers - Core results\n\
             2. Methods - Approaches in play\n\
             3. Open Problems - Known gaps\n\
             4. Consensus - Level of agreement\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::SemanticScholar => {
            "Assess the question through citation analysis:\n\
             1. Influential Works - Most-cited contributions\n\
             2. Research Lineage - How the field developed\n\
             3. Emerging Threads - Recent momentum\n\
             4. Authority - Credibility of key venues\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::PubMed => {
            "Assess the question against biomedical literature:\n\
             1. Clinical Evidence - Study outcomes\n\
             2. Study Quality - Design and sample sizes\n\
             3. Safety Signals - Adverse findings\n\
             4. Guidelines - Current recommendations\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::ClinicalTrials => {
            "Assess the active and completed trial landscape:\n\
             1. Trial Pipeline - Phases underway\n\
             2. Endpoints - What is being measured\n\
             3. Enrollment - Scale and populations\n\
             4. Results - Reported outcomes\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::MarketData => {
            "Assess the question from a market perspective:\n\
             1. Price Action - Relevant movements\n\
             2. Fundamentals - Underlying drivers\n\
             3. Sentiment - Market positioning\n\
             4. Risks - Downside scenarios\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::Perplexity => {
            "Synthesize a current-knowledge answer:\n\
             1. Direct Answer - Best current response\n\
             2. Supporting Evidence - Why it holds\n\
             3. Caveats - Where it could be wrong\n\
             4. Freshness - How recent the basis is\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::Reddit => {
            "Assess practitioner and community sentiment:\n\
             1. Prevailing Opinion - What users report\n\
             2. Pain Points - Recurring complaints\n\
             3. Praise - What is working well\n\
             4. Credibility - Signal versus noise\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::YouTube => {
            "Assess long-form video coverage:\n\
             1. Notable Coverage - In-depth treatments\n\
             2. Demonstrations - Hands-on evidence\n\
             3. Reviewer Consensus - Agreement level\n\
             4. Production Bias - Sponsorship concerns\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::GitHub => {
            "Assess the open-source ecosystem around the question:\n\
             1. Active Projects - Maintained implementations\n\
             2. Adoption - Stars, forks, dependents\n\
             3. Issue Themes - Recurring problems\n\
             4. Momentum - Commit and release cadence\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::ContextAnalyzer => {
            "Analyze the supplied context material:\n\
             1. Core Claims - What the material asserts\n\
             2. Relevance - Bearing on the question\n\
             3. Quality - Rigor of the material\n\
             4. Conflicts - Tension with outside knowledge\n\
             5. Score: Rate X/10 (MUST include) for evidence strength"
        }
        AgentId::Judge | AgentId::Debate => "",
    }
}

/// Full prompt for a panel or research agent invocation.
pub(crate) fn render(id: AgentId, payload: &Payload, context: &str) -> String {
    let subject = match payload {
        // The design image rides along in the message body.
        Payload::Design { .. } => String::new(),
        Payload::Research { question } => format!("Research question: {question}\n\n"),
    };

    format!(
        "{}\n\nContext: {}\n\n{}{}\n\nProvide detailed, actionable insights with specific recommendations.",
        persona(id),
        context,
        subject,
        instructions(id)
    )
}

/// Post-pass critique prompt over the aggregated report.
pub(crate) fn judge(report: &str) -> String {
    format!(
        "You are a demanding review judge. Critique the aggregated multi-agent \
         report below for rigor, consistency, and completeness.\n\n\
         Respond with only a JSON object of the form \
         {{\"overall_score\": <number 0-10>, \"required_fixes\": [\"<fix>\", ...]}}.\n\n\
         Report:\n{report}"
    )
}

/// One side's turn in the adversarial exchange, given the transcript so far.
pub(crate) fn debate(role: DebateRole, subject: &str, transcript: &[DebateTurn]) -> String {
    let stance = match role {
        DebateRole::Pro => "Argue the strongest honest case FOR",
        DebateRole::Con => "Argue the strongest honest case AGAINST",
    };

    let mut prompt = format!(
        "You are one side of a structured debate. {stance}: {subject}\n\n\
         Rebut the other side where the transcript gives you an opening. \
         Keep the turn under 150 words."
    );

    if !transcript.is_empty() {
        prompt.push_str("\n\nTranscript so far:\n");
        for turn in transcript {
            prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_invocable_id_has_a_persona_and_score_line() {
        let ids = [
            AgentId::Brand,
            AgentId::Aesthetic,
            AgentId::Conversion,
            AgentId::Monetization,
            AgentId::Privacy,
            AgentId::Ethical,
            AgentId::Trends,
            AgentId::WebSearch,
            AgentId::Arxiv,
            AgentId::SemanticScholar,
            AgentId::PubMed,
            AgentId::ClinicalTrials,
            AgentId::MarketData,
            AgentId::Perplexity,
            AgentId::Reddit,
            AgentId::YouTube,
            AgentId::GitHub,
            AgentId::ContextAnalyzer,
        ];
        for id in ids {
            assert!(!persona(id).is_empty(), "{id} needs a persona");
            assert!(
                instructions(id).contains("Rate X/10 (MUST include)"),
                "{id} must demand an explicit score"
            );
        }
    }

    #[test]
    fn research_payload_is_woven_into_the_prompt() {
        let payload = Payload::research("impact of GLP-1 agonists on healthcare costs");
        let prompt = render(AgentId::PubMed, &payload, "uploaded notes");
        assert!(prompt.contains("Research question: impact of GLP-1"));
        assert!(prompt.contains("Context: uploaded notes"));
    }

    #[test]
    fn debate_prompt_carries_the_transcript() {
        let transcript = vec![DebateTurn {
            role: DebateRole::Pro,
            content: "Evidence favors adoption.".to_string(),
        }];
        let prompt = debate(DebateRole::Con, "the proposal", &transcript);
        assert!(prompt.contains("case AGAINST"));
        assert!(prompt.contains("Pro: Evidence favors adoption."));
    }
}
