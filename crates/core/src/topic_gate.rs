//! Keyword gate that keeps the general chat on home-improvement subjects.
//!
//! Matching is plain substring containment on the lowercased message: no
//! tokenization, no stemming, no negative keywords. A word that happens to
//! embed a keyword (e.g. "dakota" contains "dak") is accepted.

/// Domain keywords: trades, rooms, materials, tools and planning vocabulary.
pub const HOME_IMPROVEMENT_KEYWORDS: &[&str] = &[
    "klus",
    "verbouwen",
    "repareren",
    "maken",
    "bouwen",
    "installeren",
    "schilderen",
    "tegelen",
    "loodgieterswerk",
    "elektriciteit",
    "houtbewerking",
    "metaalbewerking",
    "metselen",
    "beton",
    "isolatie",
    "dak",
    "muur",
    "vloer",
    "plafond",
    "keuken",
    "badkamer",
    "tuin",
    "terras",
    "schutting",
    "garage",
    "kelder",
    "zolder",
    "gereedschap",
    "materiaal",
    "tool",
    "machine",
    "veiligheid",
    "bescherming",
    "stappenplan",
    "werkwijze",
    "techniek",
    "methode",
    "aanpak",
    "planning",
    "tijdsduur",
    "kosten",
    "budget",
    "offerte",
    "factuur",
    "werkbon",
];

/// Canned reply for messages that fail the gate.
pub const OFF_TOPIC_REPLY: &str = "Hallo! Ik ben specifiek ontworpen om je te helpen met klus-gerelateerde vragen.

Kun je me een vraag stellen over:
🔨 Verbouwingen of reparaties
🛠️ Gereedschap of materialen
📋 Stappenplannen of werkwijzen
⏱️ Tijdsinschattingen
⚠️ Veiligheidsadvies
🏠 Specifieke klussen (keuken, badkamer, tuin, etc.)

Ik help je graag verder met je klusvraag!";

/// Return `true` if `message` mentions at least one domain keyword.
pub fn is_home_improvement(message: &str) -> bool {
    let lowered = message.to_lowercase();
    HOME_IMPROVEMENT_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// The first keyword found in `message`, if any. Used for debug logging.
pub fn matched_keyword(message: &str) -> Option<&'static str> {
    let lowered = message.to_lowercase();
    HOME_IMPROVEMENT_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| lowered.contains(keyword))
}
