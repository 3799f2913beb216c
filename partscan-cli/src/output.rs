use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use partscan_core::PartRecord;
use partscan_scanner::{Presenter, ScanView};

/// Renders scan-session updates to the terminal.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for TerminalPresenter {
    fn load_status(&mut self, text: &str) {
        println!("{}", text.if_supports_color(Stdout, |t| t.dimmed()));
    }

    fn show_view(&mut self, view: ScanView) {
        match view {
            ScanView::Start => println!(
                "{}",
                "Ready. Scan a code to begin.".if_supports_color(Stdout, |t| t.dimmed()),
            ),
            ScanView::Scanning => println!(
                "{}",
                "Scanning... waiting for a stable read".if_supports_color(Stdout, |t| t.dimmed()),
            ),
            ScanView::Rescan => println!(
                "{}",
                "Scan the next code, or press Ctrl-D to finish."
                    .if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }

    fn live_code(&mut self, code: &str) {
        println!(
            "  {} {}",
            "Read:".if_supports_color(Stdout, |t| t.cyan()),
            code.if_supports_color(Stdout, |t| t.bold()),
        );
    }

    fn show_match(&mut self, code: &str, record: &PartRecord) {
        println!(
            "{} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            format!("Valid part {code}").if_supports_color(Stdout, |t| t.green()),
        );
        print_field("Location of Support:", &record.location);
        print_field("Supplier:", &record.supplier);
        print_field("Plant Location:", &record.plant);
        print_field("Concern #:", &record.concern_number);
        print_field("Contact:", &record.contact);
    }

    fn show_not_found(&mut self, code: &str) {
        println!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            format!("Invalid part {code}").if_supports_color(Stdout, |t| t.red()),
        );
    }
}

fn print_field(label: &str, value: &str) {
    println!(
        "    {} {}",
        label.if_supports_color(Stdout, |t| t.cyan()),
        value,
    );
}
