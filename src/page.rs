use serde::{Deserialize, Serialize};

use crate::confirmation::{ConfirmationState, CountdownPhase};
use crate::form::FormState;

const CONTENT_JSON: &str = include_str!("../assets/content.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub brand_name: String,
    pub brand_tagline: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_cta: String,
    pub ebook_title: String,
    pub ebook_myths: Vec<Highlight>,
    pub group_benefits: Vec<Highlight>,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub age: u32,
    pub location: String,
    pub content: String,
}

impl PageContent {
    /// The copy bundled with the binary.
    pub fn bundled() -> Result<Self, String> {
        serde_json::from_str(CONTENT_JSON).map_err(|e| format!("Invalid page content: {}", e))
    }
}

fn push_section(out: &mut String, heading: &str) {
    out.push_str("\n── ");
    out.push_str(heading);
    out.push_str(" ──\n\n");
}

pub fn render_page(content: &PageContent) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n{}\n", content.brand_name, content.brand_tagline));

    push_section(&mut out, &content.hero_title);
    out.push_str(&content.hero_subtitle);
    out.push('\n');

    push_section(&mut out, &content.ebook_title);
    for myth in &content.ebook_myths {
        out.push_str(&format!("  • {}\n    {}\n", myth.title, myth.description));
    }

    push_section(&mut out, "Why join the group");
    for benefit in &content.group_benefits {
        out.push_str(&format!("  ✓ {}: {}\n", benefit.title, benefit.description));
    }

    push_section(&mut out, "What members say");
    for t in &content.testimonials {
        out.push_str(&format!(
            "  \"{}\"\n    {}, {} ({})\n",
            t.content, t.name, t.age, t.location
        ));
    }

    push_section(&mut out, &content.hero_cta);
    out
}

/// Status line under the form: the error, or the in-flight notice.
pub fn render_form_status(state: &FormState) -> Option<String> {
    if state.loading {
        return Some("Sending...".to_string());
    }
    state.error.as_ref().map(|e| format!("⚠ {}", e))
}

pub fn render_confirmation(state: &ConfirmationState) -> String {
    if !state.visible {
        return "Confirmation closed.".to_string();
    }

    let mut out = String::from("🎉 Registration complete!\n");
    if !state.email.is_empty() {
        out.push_str(&format!("Registered email: {}\n", state.email));
    }

    match state.phase {
        CountdownPhase::Counting if state.countdown_seconds > 0 => {
            out.push_str(&format!(
                "Redirecting automatically in {}s. [j] join now  [c] cancel  [x] close later\n",
                state.countdown_seconds
            ));
        }
        CountdownPhase::Redirecting => out.push_str("Redirecting...\n"),
        _ => out.push_str("[j] join the VIP group  [x] close and join later\n"),
    }
    out
}
