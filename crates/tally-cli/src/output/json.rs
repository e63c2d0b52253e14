use tally_core::error::ReportError;
use tally_core::Analysis;

pub fn print(analysis: &Analysis) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(analysis)?;
    println!("{json}");
    Ok(())
}
