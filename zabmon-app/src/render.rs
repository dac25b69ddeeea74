//! Console rendering of display updates.
//!
//! Consumes the scheduler's snapshots; never touches pipeline state.
//! Severity maps to a color, the theme picks normal or bright variants.

use owo_colors::{AnsiColors, OwoColorize};
use zabmon_core::model::{format_clock, severity_label, Problem};
use zabmon_core::prefs::Theme;
use zabmon_core::scheduler::{DisplayState, DisplayUpdate};

pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, update: &DisplayUpdate) {
        match update.state {
            DisplayState::Idle | DisplayState::Fetching => {
                println!("{}", update.status);
            }
            DisplayState::Error => {
                println!("{}", update.status.color(AnsiColors::Red).bold());
            }
            DisplayState::Displaying => {
                println!("{}", update.status.bold());
                if update.problems.is_empty() {
                    println!("{}", "All systems normal".color(self.ok_color()));
                } else {
                    for problem in &update.problems {
                        self.render_problem(problem);
                    }
                }
            }
        }
    }

    fn render_problem(&self, problem: &Problem) {
        println!();
        println!("{}", format_clock(&problem.clock).bold());
        println!("{}", problem.host_name.bold());
        println!(
            "{} ({})",
            problem.name.color(self.severity_color(&problem.severity)),
            severity_label(&problem.severity)
        );
    }

    fn ok_color(&self) -> AnsiColors {
        match self.theme {
            Theme::Dark => AnsiColors::BrightGreen,
            Theme::Light => AnsiColors::Green,
        }
    }

    fn severity_color(&self, severity: &str) -> AnsiColors {
        let bright = self.theme == Theme::Dark;
        match severity {
            "4" | "5" => {
                if bright {
                    AnsiColors::BrightRed
                } else {
                    AnsiColors::Red
                }
            }
            "2" | "3" => {
                if bright {
                    AnsiColors::BrightYellow
                } else {
                    AnsiColors::Yellow
                }
            }
            "1" => {
                if bright {
                    AnsiColors::BrightBlue
                } else {
                    AnsiColors::Blue
                }
            }
            _ => AnsiColors::Default,
        }
    }
}
