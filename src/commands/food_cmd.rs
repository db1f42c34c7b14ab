use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::FoodLensError;
use crate::render::render_html;
use crate::session::{ResultsArea, Session, ViewState, ANALYZING_LABEL};

/// Runs an analysis with a spinner on screen, then prints the results.
/// Upload failures are printed from the view before being returned.
pub async fn analyze(
    session: &mut Session,
    html_output: Option<&Path>,
) -> Result<(), FoodLensError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(ANALYZING_LABEL);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = session.analyze().await;
    spinner.finish_and_clear();

    print_results(session.view());

    if let (Ok(()), Some(path)) = (&outcome, html_output) {
        write_html(session.view(), path)?;
    }

    outcome
}

pub fn print_results(view: &ViewState) {
    match &view.results {
        ResultsArea::Empty => {}
        ResultsArea::Error(message) => println!("{}", message.red()),
        ResultsArea::Cards(cards) => {
            println!("\n🥗 {}", "Nutrition estimate:".bold());
            for card in cards {
                println!("{}", card.to_terminal());
            }
            println!();
        }
    }
}

pub fn print_status(session: &Session) {
    let view = session.view();
    match session.active_image() {
        Some(blob) => println!(
            "🖼️  Image: {} ({}, {} bytes)",
            blob.name.cyan(),
            blob.media_type,
            blob.size()
        ),
        None => println!("🖼️  Image: {}", "none".dimmed()),
    }
    println!(
        "📷 Camera: {}",
        if view.camera_preview_visible {
            "live".green()
        } else {
            "off".dimmed()
        }
    );
    println!(
        "🔍 {}: {}",
        view.analyze_label,
        if view.analyze_enabled {
            "ready".green()
        } else {
            "unavailable".red()
        }
    );
    print_results(view);
}

fn write_html(view: &ViewState, path: &Path) -> Result<(), FoodLensError> {
    if let ResultsArea::Cards(cards) = &view.results {
        std::fs::write(path, render_html(cards))?;
        println!("📝 Results written to {}", path.display().to_string().cyan());
    }
    Ok(())
}
