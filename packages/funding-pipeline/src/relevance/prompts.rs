//! Prompts for the relevance judge.

use crate::traits::judge::JudgePrompt;
use crate::types::reference::ReferenceProject;

/// System message sent with every comparison prompt.
pub const SYSTEM_PROMPT: &str = "Tu es un expert en comparaison de projets R&D.";

/// Appended to listing text cut at the word limit.
pub const TRUNCATION_MARKER: &str = " [...]";

/// Comparison prompt. `label` is the portal adjective ("européen",
/// "britannique (UKRI)"). Arguments are inserted verbatim, braces included.
pub fn compare_prompt(references: &str, label: &str, content: &str) -> String {
    format!(
        r#"Tu es un expert en analyse de projets d'entreprise.

Voici une liste de projets que cette entreprise a déjà réalisés :

{references}

Voici maintenant le contenu d'un appel à projets {label} :

{content}

Peux-tu me dire si cette opportunité est pertinente par rapport aux projets de l'entreprise ?
Merci de répondre clairement :
- Pertinence : Oui / Non
- Résumé rapide expliquant ta réponse."#
    )
}

/// Keep at most `limit` whitespace-separated words, marking the cut.
pub fn truncate_words(text: &str, limit: usize) -> String {
    let mut words = text.split_whitespace();
    let kept: Vec<&str> = words.by_ref().take(limit).collect();
    let mut out = kept.join(" ");
    if words.next().is_some() {
        out.push_str(TRUNCATION_MARKER);
    }
    out
}

/// Numbered reference list, first `max` projects only.
pub fn format_references(references: &[ReferenceProject], max: usize) -> String {
    references
        .iter()
        .take(max)
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{}. {} : {} (axe {})",
                i + 1,
                p.name,
                p.description,
                p.thematic_areas
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full judge prompt for one listing.
pub fn build_prompt(
    content: &str,
    references: &[ReferenceProject],
    portal_label: &str,
    word_limit: usize,
    max_references: usize,
) -> JudgePrompt {
    let user = compare_prompt(
        &format_references(references, max_references),
        portal_label,
        &truncate_words(content, word_limit),
    );
    JudgePrompt::new(SYSTEM_PROMPT, user)
}
