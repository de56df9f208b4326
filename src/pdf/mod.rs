// Application summary PDF generation.
// Uses genpdf - requires Liberation or similar fonts in standard paths.
use std::path::Path;

use genpdf::elements::{Break, Paragraph};
use genpdf::style::Style;
use genpdf::Element;

use crate::db::{BankAccount, SupplierApplication, TeamMember};

/// Per-requirement line for the document section.
pub struct DocumentLine {
    pub label: String,
    pub uploaded: bool,
    pub verified: bool,
}

fn load_font_family() -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, String> {
    let font_paths = [
        "/usr/share/fonts/truetype/liberation",
        "/usr/share/fonts/TTF",
        "/System/Library/Fonts/Supplemental",
        "/Library/Fonts",
    ];

    font_paths
        .iter()
        .find(|p| Path::new(p).exists())
        .and_then(|path| {
            ["LiberationSans", "DejaVuSans", "Arial"]
                .iter()
                .find_map(|name| genpdf::fonts::from_files(*path, name, None).ok())
        })
        .ok_or_else(|| "No suitable fonts found. Install: apt install fonts-liberation".to_string())
}

pub fn generate_application_summary(
    application: &SupplierApplication,
    team_members: &[TeamMember],
    bank_accounts: &[BankAccount],
    documents: &[DocumentLine],
    output_path: &Path,
) -> Result<(), String> {
    let font_family = load_font_family()?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Supplier Application {}", application.tracking_code));

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    let heading = Style::new().with_font_size(20);
    let section = Style::new().with_font_size(13).bold();

    doc.push(Paragraph::new("GCX Supplier Application").styled(heading));
    doc.push(Paragraph::new(format!("Tracking code: {}", application.tracking_code)));
    doc.push(Paragraph::new(format!(
        "Status: {}",
        application.status().label()
    )));
    doc.push(Break::new(0.5));

    doc.push(Paragraph::new("Business").styled(section));
    doc.push(Paragraph::new(format!("Name: {}", application.business_name)));
    doc.push(Paragraph::new(format!("Type: {}", application.business_type)));
    doc.push(Paragraph::new(format!(
        "Registration no.: {}",
        application.registration_number
    )));
    doc.push(Paragraph::new(format!("TIN: {}", application.tin_number)));
    doc.push(Paragraph::new(format!(
        "Address: {}, {}",
        application.physical_address, application.city
    )));
    doc.push(Paragraph::new(format!("Telephone: {}", application.telephone)));
    doc.push(Paragraph::new(format!("Email: {}", application.email)));
    doc.push(Paragraph::new(format!(
        "Warehouse: {}",
        application.warehouse_location
    )));
    doc.push(Break::new(0.5));

    if !team_members.is_empty() {
        doc.push(Paragraph::new("Team").styled(section));
        for member in team_members {
            doc.push(Paragraph::new(format!(
                "{} - {} ({} years experience)",
                member.full_name,
                if member.position.is_empty() {
                    "team member"
                } else {
                    &member.position
                },
                member.years_experience.unwrap_or(0)
            )));
        }
        doc.push(Break::new(0.5));
    }

    if !bank_accounts.is_empty() {
        doc.push(Paragraph::new("Bank accounts").styled(section));
        for account in bank_accounts {
            doc.push(Paragraph::new(format!(
                "{} ({}) - {}",
                account.bank_name, account.branch, account.account_number
            )));
        }
        doc.push(Break::new(0.5));
    }

    doc.push(Paragraph::new("Documents").styled(section));
    for line in documents {
        let state = if line.verified {
            "verified"
        } else if line.uploaded {
            "uploaded"
        } else {
            "missing"
        };
        doc.push(Paragraph::new(format!("{}: {state}", line.label)));
    }

    doc.push(Break::new(0.5));
    doc.push(Paragraph::new(format!(
        "Signed by {} ({})",
        application.signer_name, application.signer_designation
    )));
    let date = chrono::Utc::now().format("%B %d, %Y").to_string();
    doc.push(Paragraph::new(format!("Generated: {date}")));

    doc.render_to_file(output_path).map_err(|e| e.to_string())
}
