//! Result cards: one per food item, with a calorie ring.

use std::f64::consts::PI;
use std::fmt::Write as _;

use colored::Colorize;

use crate::food::FoodItem;

/// Calorie count that fills the whole ring.
pub const RING_FULL_CALORIES: f64 = 500.0;
pub const RING_RADIUS: f64 = 36.0;
/// Shown in place of a name the model did not send.
pub const MISSING_NAME: &str = "undefined";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub name: String,
    /// `None` when the model sent no usable calorie count.
    pub calories: Option<i64>,
    pub progress: f64,
    pub circumference: f64,
    pub stroke_dash: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl ResultCard {
    pub fn from_item(item: &FoodItem) -> Self {
        let progress = item
            .calories
            .map_or(0.0, |cal| (cal / RING_FULL_CALORIES).clamp(0.0, 1.0));
        let circumference = 2.0 * PI * RING_RADIUS;

        Self {
            name: item.name.clone().unwrap_or_else(|| MISSING_NAME.to_string()),
            calories: item.calories.map(round_half_up),
            progress,
            circumference,
            stroke_dash: progress * circumference,
            protein: item.protein,
            carbs: item.carbs,
            fats: item.fats,
        }
    }

    pub fn calorie_label(&self) -> String {
        match self.calories {
            Some(calories) => format!("{} kcal", calories),
            None => "NaN kcal".to_string(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div class="card">
  <div class="card-content">
    <div class="calorie-circle">
      <svg width="80" height="80">
        <circle class="circle-bg" cx="40" cy="40" r="36"/>
        <circle class="circle-progress" cx="40" cy="40" r="36" stroke-dasharray="{dash} {circ}"/>
      </svg>
      <span class="circle-text">{label}</span>
    </div>
    <div>
      <h3>{name}</h3>
      <p>Protein: {protein}g</p>
      <p>Carbs: {carbs}g</p>
      <p>Fat: {fats}g</p>
    </div>
  </div>
</div>
"#,
            dash = self.stroke_dash,
            circ = self.circumference,
            label = self.calorie_label(),
            name = escape_html(&self.name),
            protein = self.protein,
            carbs = self.carbs,
            fats = self.fats,
        );
        html
    }

    /// Ten-cell bar standing in for the ring.
    pub fn to_terminal(&self) -> String {
        let filled = (self.progress * 10.0).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled));

        format!(
            "{} {} {}\n   Protein: {}g | Carbs: {}g | Fat: {}g",
            bar.green(),
            self.calorie_label().yellow().bold(),
            self.name.cyan().bold(),
            self.protein,
            self.carbs,
            self.fats
        )
    }
}

/// One card per item, in input order.
pub fn render(items: &[FoodItem]) -> Vec<ResultCard> {
    items.iter().map(ResultCard::from_item).collect()
}

pub fn render_html(cards: &[ResultCard]) -> String {
    let mut html = String::from("<div id=\"results\">\n");
    for card in cards {
        html.push_str(&card.to_html());
    }
    html.push_str("</div>\n");
    html
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
