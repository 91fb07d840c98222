/// Millimetres per inch. Layouts are edited in inches, the kernel works in millimetres.
pub const MM_PER_INCH: f64 = 25.4;

/// Convert a length in inches to millimetres.
pub fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Convert a length in millimetres to inches.
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Round a millimetre value to one decimal place for display.
pub fn display_mm(mm: f64) -> f64 {
    (mm * 10.0).round() / 10.0
}
