//! Prompt construction for the generative fallback.
//!
//! The whole knowledge base is injected as context so the model prefers FAQ
//! answers and does not invent institution-specific facts.

use crate::knowledge_base::KnowledgeBase;

/// System instructions preceding the FAQ context.
const SYSTEM_PREAMBLE: &str = "You are an FAQ assistant for a university IT help desk.
Answer the user's question using the FAQ entries below whenever one applies, quoting its answer.
If no entry applies, answer briefly and generally. Never invent contact details, URLs, \
deadlines or policies that are not in the FAQ entries; instead tell the user to contact {contact}.";

/// Render the knowledge base as numbered Q/A pairs.
pub fn knowledge_context(kb: &KnowledgeBase) -> String {
    let mut out = String::new();
    for (i, entry) in kb.entries().iter().enumerate() {
        out.push_str(&format!(
            "{}. Q: {}\n   A: {}\n",
            i + 1,
            entry.question_full.trim(),
            entry.answer.trim()
        ));
    }
    out
}

/// Full system prompt: instructions plus FAQ context.
pub fn system_prompt(kb: &KnowledgeBase, support_contact: &str) -> String {
    let mut prompt = SYSTEM_PREAMBLE.replace("{contact}", support_contact);
    if kb.is_empty() {
        prompt.push_str("\n\nThere are no FAQ entries available.");
    } else {
        prompt.push_str("\n\n### FAQ ENTRIES\n");
        prompt.push_str(&knowledge_context(kb));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FaqEntry;

    #[test]
    fn test_context_lists_every_entry_in_order() {
        let kb = KnowledgeBase::new(vec![
            FaqEntry::new("first question", &[], "first answer"),
            FaqEntry::new("second question", &[], "second answer"),
        ]);
        let ctx = knowledge_context(&kb);
        let first = ctx.find("first question").unwrap();
        let second = ctx.find("second question").unwrap();
        assert!(first < second);
        assert!(ctx.contains("A: second answer"));
    }

    #[test]
    fn test_system_prompt_mentions_contact() {
        let prompt = system_prompt(&KnowledgeBase::empty(), "help@example.edu");
        assert!(prompt.contains("help@example.edu"));
        assert!(prompt.contains("no FAQ entries"));
    }
}
