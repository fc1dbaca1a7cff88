use analogy_core::{AnalogyResult, FormState, Phase, RatingDimension, StarRating};
use colored::Colorize;
use std::fmt::Write;

/// The four analogy fields, verbatim, plus the runtime (0 when not reported)
pub fn render_result(result: &AnalogyResult) -> String {
    let mut out = String::new();
    let sections = [
        ("Final Analogy:", result.final_analogy.as_str()),
        ("Source Domain:", result.source_domain.as_str()),
        ("Target Domain:", result.target_domain.as_str()),
        ("Explanation:", result.explanation.as_str()),
    ];
    for (heading, text) in sections {
        let _ = writeln!(out, "{}", heading.cyan().bold());
        let _ = writeln!(out, "{}", text);
    }
    let _ = writeln!(
        out,
        "{} {}s",
        "Runtime:".cyan().bold(),
        result.runtime_or_zero()
    );
    out
}

pub fn render_star_row(row: &StarRating<'_>) -> String {
    format!("{} {}", row.render().yellow(), row.label)
}

/// Everything the form currently shows
pub fn render_form(state: &FormState) -> String {
    let mut out = String::new();

    match state.phase() {
        Phase::Idle => {
            let _ = writeln!(out, "{}", "Enter the concept you want to understand...".dimmed());
        }
        Phase::Generating => {
            let _ = writeln!(out, "{}", "Generating...".yellow());
        }
        Phase::Failed => {
            if let Some(error) = state.generate_error() {
                let _ = writeln!(out, "{}", error.red());
            }
        }
        Phase::ShowingResult | Phase::Submitted => {}
    }

    let Some(result) = state.result() else {
        return out;
    };

    out.push_str(&render_result(result));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Provide Your Feedback".bold());
    for dimension in RatingDimension::ALL {
        let row = StarRating::for_dimension(dimension, state.feedback());
        let _ = writeln!(out, "  [{}] {}", dimension, render_star_row(&row));
    }
    let _ = writeln!(out, "  [comment] {}", state.feedback().comment);

    if state.is_feedback_pending() {
        let _ = writeln!(out, "{}", "Submitting feedback...".yellow());
    }
    if let Some(message) = state.feedback_message() {
        if message.is_error() {
            let _ = writeln!(out, "{}", message.text().red());
        } else {
            let _ = writeln!(out, "{}", message.text().green());
        }
    }
    out
}
