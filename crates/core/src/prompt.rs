//! Prompt assembly for the three assistant call sites.
//!
//! All functions here are pure string construction. Optional project fields
//! that are absent or empty are left out of the output, never signalled.

use serde::Deserialize;

use crate::account::AudienceCategory;
use crate::chat::ChatTurn;
use crate::project::Project;
use crate::types::null_as_default;

// ---------------------------------------------------------------------------
// Persona (general chat)
// ---------------------------------------------------------------------------

const PERSONA_BODY: &str = "Je bent een professionele klusassistent voor Fixio, een platform voor doe-het-zelvers en professionals. Je expertise ligt in:

🔨 Klus-gerelateerde onderwerpen:
- Stappenplannen en werkwijzen
- Materiaal- en gereedschapsadvies
- Veiligheidsrichtlijnen
- Tijdsinschattingen
- Technische uitleg
- Probleemoplossing bij klussen

⚠️ Belangrijke regels:
1. Beantwoord ALLEEN vragen over klussen, DIY, verbouwingen, reparaties en gerelateerde onderwerpen
2. Als een vraag NIET klus-gerelateerd is, verwijs beleefd naar klus-onderwerpen
3. Geef praktisch, stap-voor-stap advies
4. Benadruk veiligheid waar relevant
5. Gebruik Nederlandse terminologie
6. Wees vriendelijk en behulpzaam
7. Geef concrete, uitvoerbare antwoorden";

const PERSONA_CLOSING: &str =
    "Antwoord altijd in het Nederlands en houd je antwoorden praktisch en toepasbaar.";

/// Audience line of the persona prompt.
pub fn audience_line(audience: AudienceCategory) -> &'static str {
    match audience {
        AudienceCategory::Professional => "🎯 Doelgroep: Professionals en zzp'ers",
        AudienceCategory::Hobbyist => "🎯 Doelgroep: Doe-het-zelvers en hobbyklussers",
    }
}

/// System prompt for the general chat. Only the audience line varies.
pub fn persona_prompt(audience: AudienceCategory) -> String {
    format!(
        "{PERSONA_BODY}\n\n{}\n\n{PERSONA_CLOSING}",
        audience_line(audience)
    )
}

// ---------------------------------------------------------------------------
// Project chat
// ---------------------------------------------------------------------------

const PROJECT_PREAMBLE: &str = "Je bent een AI-assistent die alleen vragen over het volgende project mag beantwoorden. Geef geen antwoorden over andere onderwerpen.";

const PROJECT_CLOSING: &str = "Beantwoord alleen vragen die direct over dit project gaan. Geef geen advies over andere projecten of algemene onderwerpen.";

/// The project fields the project chat is grounded on.
///
/// The dashboard sends this shape with every project-chat request; server
/// side it is built from a stored [`Project`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_steps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ai_materials: Vec<String>,
    #[serde(default)]
    pub ai_time_estimate: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&Project> for ProjectContext {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            ai_steps: project.ai_steps.clone(),
            ai_materials: project.ai_materials.clone(),
            ai_time_estimate: project.ai_time_estimate.clone(),
            notes: project.notes.clone(),
        }
    }
}

fn push_bullets(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(label);
    out.push_str(":\n");
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
}

fn push_line(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
}

/// System prompt that scopes the assistant to one project.
pub fn project_prompt(project: &ProjectContext) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(PROJECT_PREAMBLE);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Projectnaam: {}\nBeschrijving: {}\n",
        project.name, project.description
    ));
    push_bullets(&mut out, "Stappenplan", &project.ai_steps);
    push_bullets(&mut out, "Benodigdheden", &project.ai_materials);
    push_line(&mut out, "Tijdsindicatie", project.ai_time_estimate.as_deref());
    push_line(&mut out, "Notities", project.notes.as_deref());
    out.push('\n');
    out.push_str(PROJECT_CLOSING);
    out
}

/// A fully assembled conversation: system prompt plus ordered turns.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub system: String,
    pub turns: Vec<ChatTurn>,
}

/// Project prompt, prior turns verbatim, then the new user message.
pub fn project_conversation(
    project: &ProjectContext,
    history: &[ChatTurn],
    prompt: &str,
) -> Conversation {
    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.extend_from_slice(history);
    turns.push(ChatTurn::user(prompt));
    Conversation {
        system: project_prompt(project),
        turns,
    }
}

// ---------------------------------------------------------------------------
// Project wizard
// ---------------------------------------------------------------------------

/// System prompt for plan generation.
pub const WIZARD_SYSTEM_PROMPT: &str = "Je bent een behulpzame klus-assistent voor doe-het-zelvers.";

const WIZARD_INTRO: &str = "Je bent een slimme klus-assistent. Maak een gestructureerd stappenplan, een lijst met benodigde materialen, en een realistische tijdsindicatie voor het volgende DIY-project:";

const WIZARD_FORMAT: &str = r#"Geef het antwoord als JSON object met de volgende structuur:
{
  "steps": ["stap 1", "stap 2", ...],
  "materials": ["materiaal 1", "materiaal 2", ...],
  "time_estimate": "tijdsindicatie in duidelijke taal"
}"#;

/// User prompt asking for a structured plan. Image URLs, when given, are
/// listed so the model can refer to them alongside the attached images.
pub fn wizard_prompt(name: &str, description: &str, image_urls: &[String]) -> String {
    let mut out = format!("{WIZARD_INTRO}\n\nProjectnaam: {name}\nBeschrijving: {description}\n");
    if !image_urls.is_empty() {
        out.push_str("Gebruik de volgende afbeeldingen als extra context (indien relevant):\n");
        for (idx, url) in image_urls.iter().enumerate() {
            out.push_str(&format!("Afbeelding {}: {url}\n", idx + 1));
        }
    }
    out.push('\n');
    out.push_str(WIZARD_FORMAT);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence_project() -> ProjectContext {
        ProjectContext {
            name: "Schutting bouwen".into(),
            description: "Nieuwe houten schutting plaatsen".into(),
            ..Default::default()
        }
    }

    // -- persona --

    #[test]
    fn persona_is_deterministic() {
        assert_eq!(
            persona_prompt(AudienceCategory::Hobbyist),
            persona_prompt(AudienceCategory::Hobbyist)
        );
        assert_eq!(
            persona_prompt(AudienceCategory::Professional),
            persona_prompt(AudienceCategory::Professional)
        );
    }

    #[test]
    fn personas_differ_only_in_audience_line() {
        let diy = persona_prompt(AudienceCategory::Hobbyist);
        let pro = persona_prompt(AudienceCategory::Professional);
        assert_ne!(diy, pro);

        let diy_lines: Vec<_> = diy.lines().collect();
        let pro_lines: Vec<_> = pro.lines().collect();
        assert_eq!(diy_lines.len(), pro_lines.len());
        let differing: Vec<_> = diy_lines
            .iter()
            .zip(&pro_lines)
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(differing.len(), 1);
        assert!(pro.contains("Professionals en zzp'ers"));
        assert!(diy.contains("Doe-het-zelvers en hobbyklussers"));
    }

    // -- project prompt --

    #[test]
    fn project_without_materials_has_no_materials_section() {
        let mut project = fence_project();
        project.ai_steps = vec!["Meet de lengte".into(), "Graaf de gaten".into()];
        let prompt = project_prompt(&project);
        assert!(!prompt.contains("Benodigdheden"));
        assert!(prompt.contains("Stappenplan:\n- Meet de lengte\n- Graaf de gaten\n"));
    }

    #[test]
    fn filled_project_lists_every_section() {
        let project = ProjectContext {
            ai_steps: vec!["Meet de lengte".into()],
            ai_materials: vec!["Houten palen".into(), "Schroeven".into()],
            ai_time_estimate: Some("1 dag".into()),
            notes: Some("Buren informeren".into()),
            ..fence_project()
        };
        let prompt = project_prompt(&project);
        assert!(prompt.starts_with(PROJECT_PREAMBLE));
        assert!(prompt.contains("Projectnaam: Schutting bouwen\nBeschrijving: Nieuwe houten schutting plaatsen\n"));
        assert!(prompt.contains("Benodigdheden:\n- Houten palen\n- Schroeven\n"));
        assert!(prompt.contains("Tijdsindicatie: 1 dag\n"));
        assert!(prompt.contains("Notities: Buren informeren\n"));
        assert!(prompt.ends_with(PROJECT_CLOSING));
    }

    #[test]
    fn empty_optional_strings_are_omitted() {
        let project = ProjectContext {
            ai_time_estimate: Some(String::new()),
            notes: None,
            ..fence_project()
        };
        let prompt = project_prompt(&project);
        assert!(!prompt.contains("Tijdsindicatie"));
        assert!(!prompt.contains("Notities"));
        assert!(!prompt.contains("Stappenplan"));
    }

    #[test]
    fn conversation_keeps_history_order_and_appends_prompt() {
        let history = vec![
            ChatTurn::user("Hoe diep graaf ik?"),
            ChatTurn::assistant("Ongeveer 60 cm."),
        ];
        let conversation = project_conversation(&fence_project(), &history, "En de breedte?");
        assert_eq!(conversation.turns.len(), 3);
        assert_eq!(conversation.turns[..2], history[..]);
        assert_eq!(conversation.turns[2], ChatTurn::user("En de breedte?"));
        assert!(conversation.system.contains("Schutting bouwen"));
    }

    #[test]
    fn context_from_dashboard_payload_tolerates_nulls() {
        let context: ProjectContext = serde_json::from_value(serde_json::json!({
            "name": "Vloer leggen",
            "description": null,
            "ai_steps": null
        }))
        .unwrap();
        assert_eq!(context.name, "Vloer leggen");
        assert!(context.description.is_empty());
        assert!(context.ai_steps.is_empty());
    }

    // -- wizard prompt --

    #[test]
    fn wizard_prompt_without_images_has_no_image_block() {
        let prompt = wizard_prompt("Schutting bouwen", "Nieuwe houten schutting plaatsen", &[]);
        assert!(prompt.contains("Projectnaam: Schutting bouwen\n"));
        assert!(!prompt.contains("Afbeelding"));
        assert!(prompt.ends_with(WIZARD_FORMAT));
    }

    #[test]
    fn wizard_prompt_numbers_images_from_one() {
        let urls = vec!["https://img/a.jpg".to_string(), "https://img/b.jpg".to_string()];
        let prompt = wizard_prompt("Tuin", "Terras aanleggen", &urls);
        assert!(prompt.contains("Afbeelding 1: https://img/a.jpg\nAfbeelding 2: https://img/b.jpg\n"));
    }
}
