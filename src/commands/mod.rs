use std::path::PathBuf;

use colored::Colorize;

use crate::capture::picker::FixedPathPicker;
use crate::error::FoodLensError;
use crate::session::Session;

pub mod food_cmd;
mod system;

const UPLOAD_PREFIX: &str = "upload ";

/// What the REPL should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct CommandHandler {
    session: Session,
    html_output: Option<PathBuf>,
}

impl CommandHandler {
    pub fn new(session: Session, html_output: Option<PathBuf>) -> Self {
        Self {
            session,
            html_output,
        }
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<Flow, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Flow::Continue);
        }

        match input.to_lowercase().as_str() {
            "help" | "exit" | "quit" => return system::handle_command(input),
            "upload" => {
                let outcome = self.session.start_upload().await;
                return self.report_capture(outcome);
            }
            "camera" => {
                let outcome = self.session.start_camera().await;
                if outcome.is_ok() {
                    println!("📷 Camera is live. Type {} to take a photo.", "capture".cyan());
                }
                return self.report_capture(outcome);
            }
            "capture" => {
                let outcome = self.session.capture();
                return self.report_capture(outcome);
            }
            "stop" => {
                self.session.stop_camera();
                println!("📷 Camera off");
                return Ok(Flow::Continue);
            }
            "analyze" => return self.handle_analyze().await,
            "status" => {
                food_cmd::print_status(&self.session);
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        // the keyword is case-insensitive, the path is not
        let is_upload = input
            .get(..UPLOAD_PREFIX.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(UPLOAD_PREFIX));
        if is_upload {
            let picker = FixedPathPicker::new(input[UPLOAD_PREFIX.len()..].trim());
            let outcome = self.session.start_upload_with(&picker).await;
            return self.report_capture(outcome);
        }

        Err(format!("Unknown command: {}. Type 'help' for available commands.", input))
    }

    async fn handle_analyze(&mut self) -> Result<Flow, String> {
        match food_cmd::analyze(&mut self.session, self.html_output.as_deref()).await {
            Ok(()) => Ok(Flow::Continue),
            // already printed from the results area
            Err(FoodLensError::UploadError(_)) => Ok(Flow::Continue),
            Err(FoodLensError::NoActiveImage) => {
                Err("No image selected. Use 'upload' or 'camera' first.".to_string())
            }
            Err(e) => Err(e.to_string()),
        }
    }

    /// Capture-side failures are already described in the results area.
    fn report_capture(&self, outcome: Result<(), FoodLensError>) -> Result<Flow, String> {
        match outcome {
            Ok(()) => {
                if let Some(blob) = self.session.active_image() {
                    println!(
                        "✅ Ready to analyze {} ({} bytes)",
                        blob.name.cyan(),
                        blob.size()
                    );
                }
            }
            Err(_) => food_cmd::print_results(self.session.view()),
        }
        Ok(Flow::Continue)
    }
}
