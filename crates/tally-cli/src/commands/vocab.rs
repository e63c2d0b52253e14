use std::path::Path;
use tally_core::error::ReportError;
use tally_core::vocab::{self, builtin};

pub fn list() -> Result<(), ReportError> {
    println!("Available vocabularies:\n");
    for name in builtin::PRESETS {
        let v = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, v.name, v.version);
        if let Some(ref desc) = v.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), ReportError> {
    let v = builtin::load_preset(preset)?;

    println!("{} (version {})\n", v.name, v.version);
    if let Some(ref desc) = v.description {
        println!("{}\n", desc);
    }

    print_section("Subtotal captions (whole-name match)", &v.excluded_categories);
    print_section("Pastry names (substring match)", &v.pastry_names);
    print_section("Pastry markers (end of name)", &v.pastry_suffixes);
    print_section("Staff role placeholders (excluded from rankings)", &v.staff_role_noise);
    print_section("Repeated header labels", &v.header_labels);

    Ok(())
}

fn print_section(title: &str, entries: &[String]) {
    println!("{} [{}]:", title, entries.len());
    for e in entries {
        println!("  {}", e);
    }
    println!();
}

pub fn validate(file: &Path) -> Result<(), ReportError> {
    let v = vocab::load_vocabulary(file)?;

    println!("Vocabulary '{}' (v{}) is valid.", v.name, v.version);
    println!("  Subtotal captions: {}", v.excluded_categories.len());
    println!("  Pastry names: {}", v.pastry_names.len());
    println!("  Staff roles: {}", v.staff_role_noise.len());

    // Duplicates are harmless but usually a copy-paste slip
    let mut warnings = Vec::new();
    for (list, entries) in [
        ("excluded_categories", &v.excluded_categories),
        ("pastry_names", &v.pastry_names),
        ("pastry_suffixes", &v.pastry_suffixes),
        ("staff_role_noise", &v.staff_role_noise),
        ("header_labels", &v.header_labels),
    ] {
        for dup in vocab::duplicate_entries(entries) {
            warnings.push(format!("'{}' appears more than once in {}", dup, list));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

pub fn schema() -> Result<(), ReportError> {
    print!(
        r#"Vocabulary JSON Schema
======================

A vocabulary tells the row classifier which table rows are captions or
subtotals, which products count as pastries, and which staff-table names
are role placeholders rather than people. Pass a custom file with
`tally analyze --vocab FILE`.

Top-level fields:
  name                 (string, required)  Human-readable name
  description          (string, optional)  What this vocabulary is for
  version              (string, required)  Version identifier (e.g., "2025.1")
  excluded_categories  (array, required)   Subtotal and category captions.
                                           A row whose first cell equals one
                                           of these (case-insensitive, runs of
                                           whitespace collapsed) is dropped.
  pastry_names         (array, required)   Name fragments. An item whose name
                                           contains one (case-insensitive) is
                                           ranked with the pastries.
  pastry_suffixes      (array, optional)   Markers that flag a pastry only
                                           when the name ends with them.
                                           Default: ["(C)"]
  staff_role_noise     (array, optional)   Name fragments left out of the
                                           single-origin ranking.
                                           Default: ["Cashier", "Barista", "Shift"]
  header_labels        (array, optional)   First-cell values of repeated
                                           column headers.
                                           Default: ["item", "header"]

Example:
{{
  "name": "Airport stores",
  "version": "1.0",
  "excluded_categories": ["BREAKFAST SAVOURY", "CAKES & TRAYBAKES"],
  "pastry_names": ["Croissant", "Danish"],
  "pastry_suffixes": ["(C)"],
  "staff_role_noise": ["Cashier", "Trainee"]
}}
"#
    );
    Ok(())
}
