/// Render an optional reading with a fixed number of decimals and a unit suffix.
///
/// A missing reading renders as `"N/A"`. The suffix is appended verbatim, so
/// callers decide on spacing (`"°C"` vs `" km/h"`). With `decimals == 0` the
/// value is shown as a whole number.
#[must_use]
pub fn format_measurement(value: Option<f64>, unit: &str, decimals: u32) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };

    let text = format!("{value:.prec$}", prec = decimals as usize);
    // Whole numbers never keep the sign of a negative zero; fractional ones do
    if decimals == 0 && text == "-0" {
        return format!("0{unit}");
    }

    format!("{text}{unit}")
}
