use colored::Colorize;

use super::Flow;

pub fn handle_command(input: &str) -> Result<Flow, String> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("\n{}", "🍽️  Food Lens Commands:".bold());
            println!();

            println!("📷 Capture Commands:");
            println!("  upload          - Pick a JPEG or PNG image");
            println!("  upload <path>   - Use the image at <path>");
            println!("  camera          - Start the camera preview");
            println!("  capture         - Take a photo from the camera");
            println!("  stop            - Turn the camera off");
            println!();

            println!("🔍 Analysis Commands:");
            println!("  analyze         - Estimate nutrition for the current image");
            println!("  status          - Show the current image and results");
            println!();

            println!("⚙️ System Commands:");
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            println!();
            Ok(Flow::Continue)
        }
        "exit" | "quit" => {
            println!("👋 Goodbye!");
            Ok(Flow::Exit)
        }
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string()),
    }
}
